//! Rejection reasons for card validation.
//!
//! A [`Rejection`] carries the details of why a number failed; its
//! [`ReasonCode`] is the stable, machine-readable tag callers match on.

use crate::card::Network;
use crate::cvv::CvvError;
use crate::expiry::ExpiryError;
use std::fmt;

/// Stable reason codes reported by validation and lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ReasonCode {
    /// No digits in the input.
    Empty,
    /// No catalog rule matched.
    UnrecognizedNetwork,
    /// Length not accepted by the network.
    BadLength,
    /// Luhn check failed.
    ChecksumFail,
    /// Expiry missing, malformed or in the past.
    BadExpiry,
    /// CVV missing or of the wrong length.
    BadCvv,
    /// Simulated live check scored below the threshold.
    LiveCheckFail,
    /// BIN metadata lookup failed.
    LookupFailed,
}

impl ReasonCode {
    /// The code as an upper-case identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "EMPTY",
            Self::UnrecognizedNetwork => "UNRECOGNIZED_NETWORK",
            Self::BadLength => "BAD_LENGTH",
            Self::ChecksumFail => "CHECKSUM_FAIL",
            Self::BadExpiry => "BAD_EXPIRY",
            Self::BadCvv => "BAD_CVV",
            Self::LiveCheckFail => "LIVE_CHECK_FAIL",
            Self::LookupFailed => "LOOKUP_FAILED",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a card number was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The input contained no digits.
    Empty,

    /// The prefix did not match any known network.
    UnrecognizedNetwork,

    /// The length is not issued by the detected network.
    BadLength {
        /// The detected network.
        network: Network,
        /// Number of digits provided.
        length: usize,
        /// Lengths the network accepts.
        valid_lengths: &'static [u8],
    },

    /// The Luhn check digit is wrong.
    ChecksumFail,

    /// The expiry date is missing or unusable.
    BadExpiry(ExpiryError),

    /// The CVV is missing or unusable.
    BadCvv(CvvError),

    /// The simulated live check scored below the pass threshold.
    LiveCheckFail {
        /// Score obtained.
        score: u32,
        /// Score needed to pass.
        threshold: u32,
    },
}

impl Rejection {
    /// The stable code for this rejection.
    pub const fn code(&self) -> ReasonCode {
        match self {
            Self::Empty => ReasonCode::Empty,
            Self::UnrecognizedNetwork => ReasonCode::UnrecognizedNetwork,
            Self::BadLength { .. } => ReasonCode::BadLength,
            Self::ChecksumFail => ReasonCode::ChecksumFail,
            Self::BadExpiry(_) => ReasonCode::BadExpiry,
            Self::BadCvv(_) => ReasonCode::BadCvv,
            Self::LiveCheckFail { .. } => ReasonCode::LiveCheckFail,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "card number is empty"),

            Self::UnrecognizedNetwork => {
                write!(f, "unrecognized card network - check the card number prefix")
            }

            Self::BadLength {
                network,
                length,
                valid_lengths,
            } => {
                let valid: Vec<String> = valid_lengths.iter().map(|l| l.to_string()).collect();
                write!(
                    f,
                    "{} numbers must have {} digits, got {}",
                    network.display_name(),
                    valid.join(", "),
                    length
                )
            }

            Self::ChecksumFail => {
                write!(f, "invalid checksum (Luhn check failed) - please verify the card number")
            }

            Self::BadExpiry(e) => write!(f, "bad expiry date: {}", e),

            Self::BadCvv(e) => write!(f, "bad CVV: {}", e),

            Self::LiveCheckFail { score, threshold } => {
                write!(f, "live check failed: score {} below {}", score, threshold)
            }
        }
    }
}

impl std::error::Error for Rejection {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BadExpiry(e) => Some(e),
            Self::BadCvv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ExpiryError> for Rejection {
    fn from(err: ExpiryError) -> Self {
        Self::BadExpiry(err)
    }
}

impl From<CvvError> for Rejection {
    fn from(err: CvvError) -> Self {
        Self::BadCvv(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_display() {
        assert_eq!(Rejection::Empty.to_string(), "card number is empty");

        assert_eq!(
            Rejection::BadLength {
                network: Network::Visa,
                length: 15,
                valid_lengths: &[13, 16, 19],
            }
            .to_string(),
            "Visa numbers must have 13, 16, 19 digits, got 15"
        );

        assert_eq!(
            Rejection::LiveCheckFail {
                score: 65,
                threshold: 70
            }
            .to_string(),
            "live check failed: score 65 below 70"
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(Rejection::ChecksumFail.code(), ReasonCode::ChecksumFail);
        assert_eq!(
            Rejection::BadCvv(CvvError::Missing).code().as_str(),
            "BAD_CVV"
        );
        assert_eq!(ReasonCode::LookupFailed.to_string(), "LOOKUP_FAILED");
    }

    #[test]
    fn test_error_source() {
        use std::error::Error;
        let err = Rejection::from(ExpiryError::Missing);
        assert!(err.source().is_some());
        assert!(Rejection::ChecksumFail.source().is_none());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Rejection>();
        assert_send_sync::<ReasonCode>();
    }
}
