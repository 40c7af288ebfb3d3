//! Test card generation.
//!
//! Generated numbers pass Luhn (where the network uses it), classify as the
//! requested network and have a length that network issues. They are not
//! connected to real accounts and are meant for testing only.
//!
//! Randomness is injected, so a seeded RNG gives reproducible cards.
//!
//! # Example
//!
//! ```
//! use cc_checker::generate::{generate, GenerateTarget};
//! use cc_checker::{is_valid, CheckerConfig, Network, YearMonth};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let today = YearMonth::new(2025, 6).unwrap();
//! let config = CheckerConfig::default();
//!
//! let card = generate(GenerateTarget::Network(Network::Visa), &mut rng, today, &config);
//! let number = card.number.as_ref().unwrap();
//! assert!(is_valid(&number.number()));
//! assert_eq!(number.len(), 16);
//! assert_eq!(card.cvv.len(), 3);
//! ```

use crate::bin::{IssuerEntry, StaticBinTable};
use crate::card::{digits_to_string, CardNumber, Network};
use crate::config::CheckerConfig;
use crate::cvv::random_cvv;
use crate::detect::{classify_bin, classify_digits};
use crate::expiry::{random_expiry, ExpiryDate, YearMonth};
use crate::format::{format_for_display, format_partial};
use crate::luhn;
use crate::validate::check_number;
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Bank name reported for networks without curated BINs.
pub const UNKNOWN_BANK: &str = "Unknown Bank";

/// Length of generated numbers for a network.
pub const fn target_length(network: Network) -> usize {
    match network {
        Network::Amex => 15,
        Network::Diners => 14,
        _ => 16,
    }
}

/// Prefix used for networks without curated BINs.
const fn generic_prefix(network: Network) -> &'static str {
    match network {
        Network::Maestro => "50",
        Network::UnionPay => "62",
        Network::Visa => "4",
        Network::Mastercard => "51",
        Network::Amex => "34",
        Network::Discover => "6011",
        Network::Diners => "36",
        Network::Jcb => "3528",
    }
}

/// What to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateTarget {
    /// A specific network.
    Network(Network),
    /// A network drawn uniformly from [`Network::PRIMARY`] for each card.
    Random,
    /// An equal share of every primary network (for [`generate_many`]);
    /// a single card behaves like `Random`.
    All,
}

impl FromStr for GenerateTarget {
    type Err = crate::card::UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "all" => Ok(Self::All),
            other => other.parse().map(Self::Network),
        }
    }
}

impl fmt::Display for GenerateTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(n) => f.write_str(n.id()),
            Self::Random => f.write_str("random"),
            Self::All => f.write_str("all"),
        }
    }
}

/// A generated test card.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GeneratedCard {
    /// The number; `None` when every attempt failed.
    pub number: Option<CardNumber>,
    /// Network the card was generated for.
    pub network: Network,
    /// Zero-padded CVV of the network's length.
    pub cvv: String,
    /// Random expiry.
    pub expiry: ExpiryDate,
    /// Bank of the chosen BIN.
    pub bank: String,
    /// Country code of the chosen BIN.
    pub country_code: String,
    /// Result of re-running the validator on the number.
    pub is_valid: bool,
}

impl GeneratedCard {
    /// The number grouped for display, or an empty string after a failure.
    pub fn formatted(&self) -> String {
        self.number
            .as_ref()
            .map(|n| format_for_display(&n.number()))
            .unwrap_or_default()
    }

    /// Renders the card as one export line; `None` after a failure.
    ///
    /// Both formats are read back by [`crate::bulk::parse_bulk`].
    pub fn export_line(&self, format: ExportFormat) -> Option<String> {
        let digits = self.number.as_ref()?.number();
        let line = match format {
            ExportFormat::Pipe => {
                format!("{} | {} | {}", format_for_display(&digits), self.expiry, self.cvv)
            }
            ExportFormat::Spaced => format!(
                "{}   {:02} {:02} {}",
                format_partial(&digits),
                self.expiry.month(),
                self.expiry.short_year(),
                self.cvv
            ),
        };
        Some(line)
    }
}

/// Export line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ExportFormat {
    /// `4532 0151 1283 0366 | 05/26 | 244`
    #[default]
    Pipe,
    /// `4532 0151 1283 0366   05 26 244`; digits always in groups of 4
    Spaced,
}

/// Joins the export lines of successfully generated cards.
pub fn export_lines(cards: &[GeneratedCard], format: ExportFormat) -> String {
    cards
        .iter()
        .filter_map(|c| c.export_line(format))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fills `prefix` to `length` digits with random digits and a final check
/// digit (Luhn when `checksum`, random otherwise).
///
/// Returns `None` when the prefix is not shorter than `length` or holds a
/// non-digit.
///
/// ```
/// use cc_checker::generate::fill_number;
/// use cc_checker::luhn_valid;
///
/// let digits = fill_number("453201", 16, true, &mut rand::thread_rng()).unwrap();
/// assert_eq!(digits.len(), 16);
/// assert!(luhn_valid(&digits));
/// ```
pub fn fill_number<R: Rng + ?Sized>(
    prefix: &str,
    length: usize,
    checksum: bool,
    rng: &mut R,
) -> Option<String> {
    if prefix.len() >= length || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut digits: Vec<u8> = prefix.bytes().map(|b| b - b'0').collect();
    while digits.len() < length - 1 {
        digits.push(rng.gen_range(0..10));
    }
    let last = if checksum {
        luhn::generate_check_digit(&digits)
    } else {
        rng.gen_range(0..10)
    };
    digits.push(last);
    Some(digits_to_string(&digits))
}

/// True if `digits` is an acceptable generated number for `network`.
fn acceptable(digits: &str, network: Network, length: usize) -> bool {
    let Some(classification) = classify_digits(&crate::card::extract_digits(digits)) else {
        return false;
    };
    let luhn_ok = !classification.uses_checksum || luhn::luhn_valid(digits);
    let bin_ok = classify_bin(digits).map_or(false, |b| b.valid);
    classification.network == network
        && classification.accepts_length(digits.len())
        && luhn_ok
        && bin_ok
        && digits.len() == length
}

fn pick_network<R: Rng + ?Sized>(rng: &mut R) -> Network {
    Network::PRIMARY[rng.gen_range(0..Network::PRIMARY.len())]
}

/// Generates one card.
///
/// `Random` and `All` draw the network uniformly from the primary networks.
pub fn generate<R: Rng + ?Sized>(
    target: GenerateTarget,
    rng: &mut R,
    today: YearMonth,
    config: &CheckerConfig,
) -> GeneratedCard {
    let network = match target {
        GenerateTarget::Network(n) => n,
        GenerateTarget::Random | GenerateTarget::All => pick_network(rng),
    };
    generate_for(network, rng, today, config)
}

/// Generates one card for `network`.
pub fn generate_for<R: Rng + ?Sized>(
    network: Network,
    rng: &mut R,
    today: YearMonth,
    config: &CheckerConfig,
) -> GeneratedCard {
    let length = target_length(network);
    let curated: Vec<&'static IssuerEntry> = StaticBinTable::curated(network).collect();
    let (prefix, bank, country) = if curated.is_empty() {
        (
            generic_prefix(network),
            UNKNOWN_BANK.to_string(),
            config.default_country.clone(),
        )
    } else {
        let entry = curated[rng.gen_range(0..curated.len())];
        (entry.prefix, entry.bank.to_string(), entry.country.to_string())
    };
    let checksum = crate::catalog::spec_for(network).uses_checksum;

    let mut number = None;
    for attempt in 1..=config.max_generation_attempts {
        let Some(candidate) = fill_number(prefix, length, checksum, rng) else {
            break;
        };
        if acceptable(&candidate, network, length) {
            number = CardNumber::parse(&candidate);
            break;
        }
        debug!(network = network.id(), attempt, "generated candidate rejected");
    }

    if number.is_none() {
        warn!(
            network = network.id(),
            prefix,
            attempts = config.max_generation_attempts,
            "could not generate a valid card"
        );
    }

    let is_valid = number
        .as_ref()
        .map_or(false, |n| check_number(&n.number()).is_ok());

    GeneratedCard {
        number,
        network,
        cvv: random_cvv(rng, network),
        expiry: random_expiry(rng, today, config.expiry_horizon_years),
        bank,
        country_code: country,
        is_valid,
    }
}

/// Generates `count` cards.
///
/// With [`GenerateTarget::All`] each primary network contributes
/// `ceil(count / 6)` cards in [`Network::PRIMARY`] order, and the result is
/// cut to `count`.
pub fn generate_many<R: Rng + ?Sized>(
    target: GenerateTarget,
    count: usize,
    rng: &mut R,
    today: YearMonth,
    config: &CheckerConfig,
) -> Vec<GeneratedCard> {
    match target {
        GenerateTarget::All => {
            let per_network = count.div_ceil(Network::PRIMARY.len());
            Network::PRIMARY
                .iter()
                .flat_map(|&n| std::iter::repeat(n).take(per_network))
                .take(count)
                .map(|n| generate_for(n, rng, today, config))
                .collect()
        }
        _ => (0..count)
            .map(|_| generate(target, rng, today, config))
            .collect(),
    }
}
