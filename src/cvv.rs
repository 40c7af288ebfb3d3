//! CVV/CVC/CID checks and generation.
//!
//! - American Express: 4 digits (printed on front)
//! - All other networks: 3 digits
//!
//! Non-digit characters are stripped before the length is checked.
//!
//! # Example
//!
//! ```
//! use cc_checker::cvv::{validate_cvv, CvvError};
//! use cc_checker::Network;
//!
//! assert!(validate_cvv("123", Network::Visa).is_ok());
//! assert!(validate_cvv("1234", Network::Amex).is_ok());
//! assert!(matches!(
//!     validate_cvv("123", Network::Amex),
//!     Err(CvvError::WrongLength { expected: 4, length: 3, .. })
//! ));
//! ```

use crate::card::Network;
use rand::Rng;
use std::fmt;

/// Errors that can occur during CVV validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CvvError {
    /// No CVV was supplied.
    Missing,
    /// The CVV length doesn't match the network requirement.
    WrongLength {
        /// The network.
        network: Network,
        /// Digits supplied.
        length: usize,
        /// Digits required.
        expected: usize,
    },
}

impl fmt::Display for CvvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "CVV is required"),
            Self::WrongLength {
                network,
                length,
                expected,
            } => write!(
                f,
                "{} cards require a {} digit CVV, got {}",
                network.display_name(),
                expected,
                length
            ),
        }
    }
}

impl std::error::Error for CvvError {}

/// Returns the CVV length for a network.
#[inline]
pub const fn cvv_length_for(network: Network) -> usize {
    match network {
        Network::Amex => 4,
        _ => 3,
    }
}

/// Validates a CVV for `network`, returning its digits.
pub fn validate_cvv(input: &str, network: Network) -> Result<String, CvvError> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(CvvError::Missing);
    }
    let expected = cvv_length_for(network);
    if digits.len() != expected {
        return Err(CvvError::WrongLength {
            network,
            length: digits.len(),
            expected,
        });
    }
    Ok(digits)
}

/// Returns true if `input` is a valid CVV for `network`.
#[inline]
pub fn is_valid_cvv(input: &str, network: Network) -> bool {
    validate_cvv(input, network).is_ok()
}

/// Draws a zero-padded random CVV of the network's length.
pub fn random_cvv<R: Rng + ?Sized>(rng: &mut R, network: Network) -> String {
    match cvv_length_for(network) {
        4 => format!("{:04}", rng.gen_range(0..10_000u32)),
        _ => format!("{:03}", rng.gen_range(0..1_000u32)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_cvv_lengths() {
        assert_eq!(cvv_length_for(Network::Amex), 4);
        for network in Network::ALL.into_iter().filter(|n| *n != Network::Amex) {
            assert_eq!(cvv_length_for(network), 3);
        }
    }

    #[test]
    fn test_strips_non_digits() {
        assert_eq!(validate_cvv(" 1-2-3 ", Network::Visa).unwrap(), "123");
    }

    #[test]
    fn test_wrong_length() {
        assert!(validate_cvv("1234", Network::Visa).is_err());
        assert!(validate_cvv("12", Network::Mastercard).is_err());
        assert!(!is_valid_cvv("123", Network::Amex));
    }

    #[test]
    fn test_missing() {
        assert_eq!(validate_cvv("", Network::Visa), Err(CvvError::Missing));
        assert_eq!(validate_cvv("abc", Network::Visa), Err(CvvError::Missing));
    }

    #[test]
    fn test_leading_zeros_kept() {
        assert_eq!(validate_cvv("007", Network::Jcb).unwrap(), "007");
    }

    #[test]
    fn test_random_cvv_is_padded() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let cvv = random_cvv(&mut rng, Network::Amex);
            assert!(is_valid_cvv(&cvv, Network::Amex), "{}", cvv);
            let cvv = random_cvv(&mut rng, Network::Visa);
            assert!(is_valid_cvv(&cvv, Network::Visa), "{}", cvv);
        }
    }

    #[test]
    fn test_cvv_error_display() {
        let err = CvvError::WrongLength {
            network: Network::Amex,
            length: 3,
            expected: 4,
        };
        assert_eq!(
            err.to_string(),
            "American Express cards require a 4 digit CVV, got 3"
        );
    }
}
