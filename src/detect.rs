//! Network detection from BIN/IIN prefixes.
//!
//! Detection walks the catalog in order and returns the first rule whose
//! anchored pattern matches the start of the number. Non-digit characters
//! in the input are ignored.

use crate::card::{digits_to_string, extract_digits, Network};
use crate::catalog::{self, NetworkSpec};
use tracing::debug;

/// Minimum number of digits before a classification is attempted.
pub const MIN_CLASSIFY_DIGITS: usize = 2;

/// Number of digits a BIN check inspects.
pub const BIN_LENGTH: usize = 6;

/// Result of classifying a (possibly partial) card number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Classification {
    /// Matched network.
    pub network: Network,
    /// Label of the matching BIN rule.
    pub label: &'static str,
    /// Lengths the network issues.
    pub valid_lengths: &'static [u8],
    /// Whether the network uses a Luhn check digit.
    pub uses_checksum: bool,
}

impl Classification {
    fn from_spec(spec: &'static NetworkSpec, label: &'static str) -> Self {
        Self {
            network: spec.network,
            label,
            valid_lengths: spec.valid_lengths,
            uses_checksum: spec.uses_checksum,
        }
    }

    /// The catalog entry of the matched network.
    pub fn spec(&self) -> &'static NetworkSpec {
        catalog::spec_for(self.network)
    }

    /// Returns true if `length` is accepted by the matched network.
    #[inline]
    pub fn accepts_length(&self, length: usize) -> bool {
        self.valid_lengths.iter().any(|&l| l as usize == length)
    }
}

/// Outcome of [`classify_bin`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BinCheck {
    /// True when the BIN belongs to a known network.
    pub valid: bool,
    /// The six digits that were inspected.
    pub bin: String,
    /// Matched network.
    pub network: Option<Network>,
    /// Label of the matching rule.
    pub label: Option<&'static str>,
}

/// Classifies a card number or prefix.
///
/// Returns `None` for fewer than two digits or when no catalog rule
/// matches.
///
/// # Example
///
/// ```
/// use cc_checker::{classify, Network};
///
/// let c = classify("6011 0000 0000 0004").unwrap();
/// assert_eq!(c.network, Network::Discover);
/// assert_eq!(c.label, "Discover Card");
///
/// assert!(classify("4").is_none());
/// assert!(classify("99").is_none());
/// ```
pub fn classify(input: &str) -> Option<Classification> {
    classify_digits(&extract_digits(input))
}

/// Classifies a sequence of digit values (0-9).
pub fn classify_digits(digits: &[u8]) -> Option<Classification> {
    if digits.len() < MIN_CLASSIFY_DIGITS {
        return None;
    }
    let text = digits_to_string(digits);
    match catalog::find_rule(&text) {
        Some((spec, rule)) => Some(Classification::from_spec(spec, rule.label)),
        None => {
            debug!(prefix = %&text[..MIN_CLASSIFY_DIGITS], "no catalog rule matched");
            None
        }
    }
}

/// Checks the six-digit BIN of a card number.
///
/// Returns `None` when fewer than six digits are present; otherwise the
/// first six digits are classified.
///
/// # Example
///
/// ```
/// use cc_checker::{classify_bin, Network};
///
/// let check = classify_bin("3056930902").unwrap();
/// assert!(check.valid);
/// assert_eq!(check.bin, "305693");
/// assert_eq!(check.network, Some(Network::Diners));
/// assert_eq!(check.label, Some("Diners Club Carte Blanche"));
///
/// assert!(classify_bin("41111").is_none());
/// assert!(!classify_bin("999999").unwrap().valid);
/// ```
pub fn classify_bin(input: &str) -> Option<BinCheck> {
    let digits = extract_digits(input);
    if digits.len() < BIN_LENGTH {
        return None;
    }
    let bin = &digits[..BIN_LENGTH];
    let found = classify_digits(bin);
    Some(BinCheck {
        valid: found.is_some(),
        bin: digits_to_string(bin),
        network: found.map(|c| c.network),
        label: found.map(|c| c.label),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network_of(input: &str) -> Option<Network> {
        classify(input).map(|c| c.network)
    }

    #[test]
    fn test_amex() {
        assert_eq!(network_of("34"), Some(Network::Amex));
        assert_eq!(network_of("378282246310005"), Some(Network::Amex));
    }

    #[test]
    fn test_mastercard_ranges() {
        assert_eq!(network_of("2221"), Some(Network::Mastercard));
        assert_eq!(network_of("2300"), Some(Network::Mastercard));
        assert_eq!(network_of("2720"), Some(Network::Mastercard));
        assert_eq!(network_of("5100"), Some(Network::Mastercard));
        assert_eq!(network_of("5500"), Some(Network::Mastercard));
        assert_eq!(network_of("2220"), None);
        assert_eq!(network_of("2721"), None);
    }

    #[test]
    fn test_visa() {
        assert_eq!(network_of("41"), Some(Network::Visa));
        assert_eq!(network_of("4532015112830366"), Some(Network::Visa));
    }

    #[test]
    fn test_discover_ranges() {
        assert_eq!(network_of("6011000000000004"), Some(Network::Discover));
        assert_eq!(network_of("6221260000000000"), Some(Network::Discover));
        assert_eq!(network_of("6445"), Some(Network::Discover));
        assert_eq!(network_of("6500"), Some(Network::Discover));
    }

    #[test]
    fn test_unionpay_not_maestro() {
        assert_eq!(network_of("6200000000000005"), Some(Network::UnionPay));
        assert_eq!(network_of("6210"), Some(Network::UnionPay));
        assert_eq!(network_of("62"), Some(Network::UnionPay));
    }

    #[test]
    fn test_maestro() {
        assert_eq!(network_of("5018"), Some(Network::Maestro));
        assert_eq!(network_of("5600"), Some(Network::Maestro));
        assert_eq!(network_of("6304"), Some(Network::Maestro));
        assert_eq!(network_of("6012"), Some(Network::Maestro));
    }

    #[test]
    fn test_diners_and_jcb() {
        assert_eq!(network_of("3056"), Some(Network::Diners));
        assert_eq!(network_of("3600"), Some(Network::Diners));
        assert_eq!(network_of("3528"), Some(Network::Jcb));
        assert_eq!(network_of("3589"), Some(Network::Jcb));
        assert_eq!(network_of("3527"), None);
        assert_eq!(network_of("3060"), None);
    }

    #[test]
    fn test_too_short() {
        assert!(classify("").is_none());
        assert!(classify("4").is_none());
        assert!(classify("4-").is_none());
    }

    #[test]
    fn test_classify_is_pure() {
        let a = classify("5425233430109903");
        let b = classify("5425233430109903");
        assert_eq!(a, b);
    }

    #[test]
    fn test_classify_bin() {
        let check = classify_bin("4532015112830366").unwrap();
        assert_eq!(check.bin, "453201");
        assert_eq!(check.network, Some(Network::Visa));
        assert_eq!(check.label, Some("Visa"));

        let check = classify_bin("123456").unwrap();
        assert!(!check.valid);
        assert_eq!(check.network, None);
        assert_eq!(check.label, None);
    }
}
