//! Core card types: the `Network` identifier and the `CardNumber` holder.
//!
//! `CardNumber` keeps its digits in a fixed-size array that is zeroed on
//! drop, and never prints the full number through `Debug` or `Display`.

use std::fmt;
use std::str::FromStr;
use zeroize::Zeroize;

/// Maximum number of digits in a card number.
pub const MAX_CARD_DIGITS: usize = 19;

/// Card networks known to the catalog.
///
/// The variant order is the order networks are listed in; the order in which
/// they are *matched* lives in [`crate::catalog::CATALOG`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Network {
    /// American Express - 34, 37
    Amex,
    /// MasterCard - 51-55, 2221-2720
    Mastercard,
    /// Visa - 4
    Visa,
    /// Discover - 6011, 622126-622925, 644-649, 65
    Discover,
    /// Diners Club - 300-305, 36
    Diners,
    /// JCB - 3528-3589
    Jcb,
    /// Maestro - 50, 56-58, 6
    Maestro,
    /// China UnionPay - 62
    UnionPay,
}

impl Network {
    /// Every network, in listing order.
    pub const ALL: [Network; 8] = [
        Network::Amex,
        Network::Mastercard,
        Network::Visa,
        Network::Discover,
        Network::Diners,
        Network::Jcb,
        Network::Maestro,
        Network::UnionPay,
    ];

    /// The networks the generator picks from when asked for a random card.
    pub const PRIMARY: [Network; 6] = [
        Network::Visa,
        Network::Mastercard,
        Network::Amex,
        Network::Discover,
        Network::Diners,
        Network::Jcb,
    ];

    /// Stable lowercase identifier.
    #[inline]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Amex => "amex",
            Self::Mastercard => "mastercard",
            Self::Visa => "visa",
            Self::Discover => "discover",
            Self::Diners => "diners",
            Self::Jcb => "jcb",
            Self::Maestro => "maestro",
            Self::UnionPay => "unionpay",
        }
    }

    /// Human-readable network name.
    #[inline]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Amex => "American Express",
            Self::Mastercard => "MasterCard",
            Self::Visa => "Visa",
            Self::Discover => "Discover",
            Self::Diners => "Diners Club",
            Self::Jcb => "JCB",
            Self::Maestro => "Maestro",
            Self::UnionPay => "China UnionPay",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when a network name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNetwork(pub String);

impl fmt::Display for UnknownNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown card network '{}'", self.0)
    }
}

impl std::error::Error for UnknownNetwork {}

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "amex" | "american express" | "americanexpress" => Ok(Self::Amex),
            "mastercard" | "mc" | "master card" => Ok(Self::Mastercard),
            "visa" => Ok(Self::Visa),
            "discover" => Ok(Self::Discover),
            "diners" | "diners club" | "dinersclub" => Ok(Self::Diners),
            "jcb" => Ok(Self::Jcb),
            "maestro" => Ok(Self::Maestro),
            "unionpay" | "union pay" | "china unionpay" => Ok(Self::UnionPay),
            _ => Err(UnknownNetwork(s.to_string())),
        }
    }
}

/// Extracts the decimal digits of `input` as values 0-9.
#[inline]
pub fn extract_digits(input: &str) -> Vec<u8> {
    input
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect()
}

/// Renders digit values 0-9 as an ASCII string.
#[inline]
pub fn digits_to_string(digits: &[u8]) -> String {
    digits.iter().map(|&d| (b'0' + d) as char).collect()
}

/// A card number of 1 to 19 digits.
///
/// # Security
///
/// - Memory is zeroed on drop using the `zeroize` crate
/// - `Debug` and `Display` output is masked
/// - The full number is only available through [`CardNumber::number`]
#[derive(Clone, PartialEq, Eq)]
pub struct CardNumber {
    digits: [u8; MAX_CARD_DIGITS],
    len: u8,
}

impl CardNumber {
    /// Builds a card number from raw input, ignoring every non-digit.
    ///
    /// Returns `None` when the input holds no digits or more than 19.
    ///
    /// # Example
    ///
    /// ```
    /// use cc_checker::CardNumber;
    ///
    /// let card = CardNumber::parse("4111 1111-1111 1111").unwrap();
    /// assert_eq!(card.len(), 16);
    /// assert_eq!(card.last_four(), "1111");
    /// assert!(CardNumber::parse("no digits").is_none());
    /// ```
    pub fn parse(input: &str) -> Option<Self> {
        Self::from_digits(&extract_digits(input))
    }

    /// Builds a card number from digit values (0-9).
    pub fn from_digits(digits: &[u8]) -> Option<Self> {
        if digits.is_empty() || digits.len() > MAX_CARD_DIGITS || digits.iter().any(|&d| d > 9) {
            return None;
        }
        let mut buf = [0u8; MAX_CARD_DIGITS];
        buf[..digits.len()].copy_from_slice(digits);
        Some(Self {
            digits: buf,
            len: digits.len() as u8,
        })
    }

    /// Number of digits.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Always false; a `CardNumber` holds at least one digit.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The digits as values 0-9.
    #[inline]
    pub fn digits(&self) -> &[u8] {
        &self.digits[..self.len as usize]
    }

    /// The full number as a digit string.
    ///
    /// Never log the result; use [`CardNumber::masked`] for display.
    pub fn number(&self) -> String {
        digits_to_string(self.digits())
    }

    /// The first `length` digits (capped at 8 and at the card length).
    pub fn bin(&self, length: usize) -> String {
        let n = length.min(8).min(self.len());
        digits_to_string(&self.digits[..n])
    }

    /// The last four digits, or all of them for shorter numbers.
    pub fn last_four(&self) -> String {
        let len = self.len();
        digits_to_string(&self.digits[len.saturating_sub(4)..len])
    }

    /// Masked rendering that only exposes the last four digits.
    pub fn masked(&self) -> String {
        crate::mask::mask_digits(self.digits())
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardNumber")
            .field("number", &self.masked())
            .field("length", &self.len)
            .finish()
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl Drop for CardNumber {
    fn drop(&mut self) {
        self.digits.zeroize();
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CardNumber {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.number())
    }
}
