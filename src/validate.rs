//! Card validation.
//!
//! Checks run in a fixed order and the first failure decides the verdict:
//!
//! 1. no digits → `EMPTY`
//! 2. no catalog match → `UNRECOGNIZED_NETWORK`
//! 3. length not issued by the network → `BAD_LENGTH`
//! 4. Luhn failure on a checksum network → `CHECKSUM_FAIL`
//! 5. with a live check: expiry (`BAD_EXPIRY`), CVV (`BAD_CVV`), then the
//!    weighted score (`LIVE_CHECK_FAIL`)
//!
//! Non-digit characters in the number are ignored.

use crate::card::{extract_digits, CardNumber, Network};
use crate::config::CheckerConfig;
use crate::cvv;
use crate::detect::{classify_bin, classify_digits, Classification};
use crate::error::{ReasonCode, Rejection};
use crate::expiry::{self, YearMonth};
use crate::luhn;

/// Optional inputs to [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ValidateOptions {
    /// Expiry as `MM/YY`; required for a live check.
    pub expiry: Option<String>,
    /// CVV; required for a live check.
    pub cvv: Option<String>,
    /// Run the simulated live check.
    #[cfg_attr(feature = "serde", serde(default))]
    pub live_check: bool,
}

impl ValidateOptions {
    /// Options for a plain number check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a live check with the given expiry and CVV.
    pub fn live(expiry: impl Into<String>, cvv: impl Into<String>) -> Self {
        Self {
            expiry: Some(expiry.into()),
            cvv: Some(cvv.into()),
            live_check: true,
        }
    }

    /// Sets the expiry.
    pub fn expiry(mut self, expiry: impl Into<String>) -> Self {
        self.expiry = Some(expiry.into());
        self
    }

    /// Sets the CVV.
    pub fn cvv(mut self, cvv: impl Into<String>) -> Self {
        self.cvv = Some(cvv.into());
        self
    }
}

/// Signals combined by the simulated live check.
///
/// The weights are placeholders for a real verification service:
/// Luhn 40, BIN 30, expiry 15, realistic expiry 5, CVV 10, length 20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LiveCheckScore {
    /// Number passes Luhn.
    pub luhn: bool,
    /// Six-digit BIN belongs to a known network.
    pub bin_valid: bool,
    /// Expiry is well formed and not past.
    pub expiry_valid: bool,
    /// Expiry year is within the realistic horizon.
    pub expiry_realistic: bool,
    /// CVV has the network's length.
    pub cvv_valid: bool,
    /// Length is issued by the network.
    pub length_valid: bool,
}

impl LiveCheckScore {
    /// Weight of a passing Luhn check.
    pub const LUHN_WEIGHT: u32 = 40;
    /// Weight of a known BIN.
    pub const BIN_WEIGHT: u32 = 30;
    /// Weight of a valid expiry.
    pub const EXPIRY_WEIGHT: u32 = 15;
    /// Weight of a realistic expiry year.
    pub const REALISTIC_WEIGHT: u32 = 5;
    /// Weight of a valid CVV.
    pub const CVV_WEIGHT: u32 = 10;
    /// Weight of a valid length.
    pub const LENGTH_WEIGHT: u32 = 20;

    /// Weighted sum of the signals.
    pub fn total(&self) -> u32 {
        [
            (self.luhn, Self::LUHN_WEIGHT),
            (self.bin_valid, Self::BIN_WEIGHT),
            (self.expiry_valid, Self::EXPIRY_WEIGHT),
            (self.expiry_realistic, Self::REALISTIC_WEIGHT),
            (self.cvv_valid, Self::CVV_WEIGHT),
            (self.length_valid, Self::LENGTH_WEIGHT),
        ]
        .iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, weight)| weight)
        .sum()
    }

    /// True if the total reaches `threshold`.
    #[inline]
    pub fn passes(&self, threshold: u32) -> bool {
        self.total() >= threshold
    }
}

/// A card number that passed validation.
#[derive(Debug, Clone)]
pub struct ValidCard {
    number: CardNumber,
    classification: Classification,
    score: Option<LiveCheckScore>,
}

impl ValidCard {
    /// The card number.
    #[inline]
    pub fn number(&self) -> &CardNumber {
        &self.number
    }

    /// The detected network.
    #[inline]
    pub fn network(&self) -> Network {
        self.classification.network
    }

    /// The full classification.
    #[inline]
    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    /// Live-check breakdown, when one was run.
    #[inline]
    pub fn score(&self) -> Option<LiveCheckScore> {
        self.score
    }
}

/// Outcome of [`validate`]: `ok` with no reason, or a single reason code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValidationVerdict {
    /// True when every check passed.
    pub ok: bool,
    /// Why validation failed; `None` when `ok`.
    pub reason_code: Option<ReasonCode>,
    /// Human-readable explanation.
    pub message: String,
    /// Detected network, if classification succeeded.
    pub network: Option<Network>,
    /// Label of the matching BIN rule.
    pub label: Option<&'static str>,
    /// Live-check score, when one was computed.
    pub score: Option<u32>,
}

impl ValidationVerdict {
    /// Verdict for a card that passed.
    pub fn from_card(card: &ValidCard) -> Self {
        let message = match card.score {
            Some(score) => format!(
                "live check passed (score {}/{})",
                score.total(),
                CheckerConfig::MAX_LIVE_SCORE
            ),
            None => format!("valid {} card", card.network().display_name()),
        };
        Self {
            ok: true,
            reason_code: None,
            message,
            network: Some(card.network()),
            label: Some(card.classification.label),
            score: card.score.map(|s| s.total()),
        }
    }

    /// Verdict for a rejection, with the classification of the input if any.
    pub fn from_rejection(rejection: &Rejection, classification: Option<Classification>) -> Self {
        let score = match rejection {
            Rejection::LiveCheckFail { score, .. } => Some(*score),
            _ => None,
        };
        Self {
            ok: false,
            reason_code: Some(rejection.code()),
            message: rejection.to_string(),
            network: classification.map(|c| c.network),
            label: classification.map(|c| c.label),
            score,
        }
    }
}

/// Checks a number without a live check: digits, network, length, Luhn.
///
/// # Example
///
/// ```
/// use cc_checker::{check_number, Network, Rejection};
///
/// let card = check_number("4532 0151 1283 0366").unwrap();
/// assert_eq!(card.network(), Network::Visa);
///
/// assert_eq!(check_number("4532015112830367").unwrap_err(), Rejection::ChecksumFail);
/// assert_eq!(check_number("").unwrap_err(), Rejection::Empty);
/// ```
pub fn check_number(input: &str) -> Result<ValidCard, Rejection> {
    let digits = extract_digits(input);
    if digits.is_empty() {
        return Err(Rejection::Empty);
    }

    let classification = classify_digits(&digits).ok_or(Rejection::UnrecognizedNetwork)?;

    if !classification.accepts_length(digits.len()) {
        return Err(Rejection::BadLength {
            network: classification.network,
            length: digits.len(),
            valid_lengths: classification.valid_lengths,
        });
    }

    if classification.uses_checksum && !luhn::validate(&digits) {
        return Err(Rejection::ChecksumFail);
    }

    // Catalog lengths never exceed MAX_CARD_DIGITS, so this only fails on a
    // malformed catalog.
    let number = CardNumber::from_digits(&digits).ok_or(Rejection::BadLength {
        network: classification.network,
        length: digits.len(),
        valid_lengths: classification.valid_lengths,
    })?;

    Ok(ValidCard {
        number,
        classification,
        score: None,
    })
}

/// Full validation returning the card or the first rejection.
pub fn validate_card(
    input: &str,
    options: &ValidateOptions,
    today: YearMonth,
    config: &CheckerConfig,
) -> Result<ValidCard, Rejection> {
    let mut card = check_number(input)?;
    if !options.live_check {
        return Ok(card);
    }

    let network = card.network();
    let expiry_input = options.expiry.as_deref().unwrap_or("");
    let expiry = expiry::validate_expiry(expiry_input, today)?;
    cvv::validate_cvv(options.cvv.as_deref().unwrap_or(""), network)?;

    let digits = card.number.digits();
    let score = LiveCheckScore {
        luhn: luhn::validate(digits),
        bin_valid: classify_bin(&card.number.bin(6)).map_or(false, |b| b.valid),
        expiry_valid: true,
        expiry_realistic: expiry.is_realistic(today, config.realistic_expiry_years),
        cvv_valid: true,
        length_valid: card.classification.accepts_length(digits.len()),
    };

    if !score.passes(config.live_check_threshold) {
        return Err(Rejection::LiveCheckFail {
            score: score.total(),
            threshold: config.live_check_threshold,
        });
    }

    card.score = Some(score);
    Ok(card)
}

/// Validates a card number and produces a verdict with default settings.
///
/// `today` is only consulted by the live check.
///
/// # Example
///
/// ```
/// use cc_checker::{validate, ReasonCode, ValidateOptions, YearMonth};
///
/// let today = YearMonth::new(2025, 6).unwrap();
///
/// let verdict = validate("4532015112830366", &ValidateOptions::new(), today);
/// assert!(verdict.ok);
/// assert_eq!(verdict.reason_code, None);
///
/// let verdict = validate("491659228999391", &ValidateOptions::new(), today);
/// assert_eq!(verdict.reason_code, Some(ReasonCode::BadLength));
///
/// let live = ValidateOptions::live("12/27", "123");
/// assert!(validate("4532015112830366", &live, today).ok);
/// ```
pub fn validate(input: &str, options: &ValidateOptions, today: YearMonth) -> ValidationVerdict {
    validate_with_config(input, options, today, &CheckerConfig::default())
}

/// Like [`validate`], with explicit thresholds.
pub fn validate_with_config(
    input: &str,
    options: &ValidateOptions,
    today: YearMonth,
    config: &CheckerConfig,
) -> ValidationVerdict {
    match validate_card(input, options, today, config) {
        Ok(card) => ValidationVerdict::from_card(&card),
        Err(rejection) => {
            ValidationVerdict::from_rejection(&rejection, classify_digits(&extract_digits(input)))
        }
    }
}

/// Quick boolean number check (no live check).
///
/// ```
/// use cc_checker::is_valid;
///
/// assert!(is_valid("378282246310005"));
/// assert!(!is_valid("378282246310006"));
/// ```
#[inline]
pub fn is_valid(input: &str) -> bool {
    check_number(input).is_ok()
}
