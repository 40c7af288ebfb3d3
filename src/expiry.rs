//! Card expiry dates.
//!
//! Only the strict `MM/YY` form is accepted; two-digit years are read as
//! 20YY. Every check that depends on "today" takes an explicit
//! [`YearMonth`] so results are reproducible.
//!
//! # Example
//!
//! ```
//! use cc_checker::expiry::{validate_expiry, ExpiryError, YearMonth};
//!
//! let today = YearMonth::new(2025, 6).unwrap();
//!
//! let exp = validate_expiry("06/25", today).unwrap();
//! assert_eq!(exp.month(), 6);
//! assert_eq!(exp.year(), 2025);
//!
//! assert!(matches!(validate_expiry("05/25", today), Err(ExpiryError::Expired { .. })));
//! assert!(matches!(validate_expiry("6/25", today), Err(ExpiryError::InvalidFormat)));
//! ```

use chrono::Datelike;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use std::fmt;

static STRICT_EXPIRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{2}$").expect("expiry pattern is a valid regex"));

/// A calendar month, used as "today" by date-dependent checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YearMonth {
    year: u16,
    month: u8,
}

impl YearMonth {
    /// Creates a year/month pair; `None` if the month is not 1-12.
    pub fn new(year: u16, month: u8) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(Self { year, month })
    }

    /// The current month according to the local clock.
    pub fn current() -> Self {
        let now = chrono::Local::now();
        Self {
            year: u16::try_from(now.year()).unwrap_or(u16::MAX),
            month: now.month() as u8,
        }
    }

    /// Four-digit year.
    #[inline]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Month (1-12).
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }
}

/// A parsed expiry date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryDate {
    month: u8,
    year: u16,
}

impl ExpiryDate {
    /// Creates an expiry date; `None` if the month is not 1-12.
    pub fn new(month: u8, year: u16) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(Self { month, year })
    }

    /// Month (1-12).
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Four-digit year.
    #[inline]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// True if the card expired before `today`'s month.
    ///
    /// A card stays valid through the end of its expiry month.
    pub fn is_expired(&self, today: YearMonth) -> bool {
        self.year < today.year || (self.year == today.year && self.month < today.month)
    }

    /// True if the expiry year is at most `horizon_years` past `today`.
    pub fn is_realistic(&self, today: YearMonth, horizon_years: u16) -> bool {
        self.year <= today.year.saturating_add(horizon_years)
    }

    /// Formats as MM/YY.
    pub fn format_short(&self) -> String {
        format!("{:02}/{:02}", self.month, self.year % 100)
    }

    /// Two-digit year.
    #[inline]
    pub const fn short_year(&self) -> u16 {
        self.year % 100
    }
}

impl fmt::Display for ExpiryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year % 100)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ExpiryDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Errors from expiry parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpiryError {
    /// No expiry was supplied.
    Missing,
    /// Not of the form `MM/YY`.
    InvalidFormat,
    /// Month outside 1-12.
    InvalidMonth(u8),
    /// The date lies before the current month.
    Expired {
        /// The expiry month.
        month: u8,
        /// The expiry year.
        year: u16,
    },
}

impl fmt::Display for ExpiryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "expiry date is required"),
            Self::InvalidFormat => write!(f, "invalid expiry format (expected MM/YY)"),
            Self::InvalidMonth(m) => write!(f, "invalid month {}: must be 1-12", m),
            Self::Expired { month, year } => write!(f, "card expired ({:02}/{})", month, year),
        }
    }
}

impl std::error::Error for ExpiryError {}

/// Parses a strict `MM/YY` expiry without checking it against today.
///
/// Surrounding whitespace is ignored.
///
/// ```
/// use cc_checker::expiry::{parse_expiry, ExpiryError};
///
/// assert_eq!(parse_expiry("12/30").unwrap().year(), 2030);
/// assert_eq!(parse_expiry("13/30"), Err(ExpiryError::InvalidMonth(13)));
/// assert_eq!(parse_expiry("12/2030"), Err(ExpiryError::InvalidFormat));
/// ```
pub fn parse_expiry(input: &str) -> Result<ExpiryDate, ExpiryError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ExpiryError::Missing);
    }
    if !STRICT_EXPIRY.is_match(input) {
        return Err(ExpiryError::InvalidFormat);
    }
    let (mm, yy) = input.split_once('/').ok_or(ExpiryError::InvalidFormat)?;
    let month: u8 = mm.parse().map_err(|_| ExpiryError::InvalidFormat)?;
    let yy: u16 = yy.parse().map_err(|_| ExpiryError::InvalidFormat)?;
    ExpiryDate::new(month, 2000 + yy).ok_or(ExpiryError::InvalidMonth(month))
}

/// Parses a strict `MM/YY` expiry and rejects dates before `today`.
pub fn validate_expiry(input: &str, today: YearMonth) -> Result<ExpiryDate, ExpiryError> {
    let expiry = parse_expiry(input)?;
    if expiry.is_expired(today) {
        return Err(ExpiryError::Expired {
            month: expiry.month,
            year: expiry.year,
        });
    }
    Ok(expiry)
}

/// Draws a random expiry: month 1-12, year within `horizon_years` of today.
///
/// The year is `today.year() + k` with `k` in `0..horizon_years`; a zero
/// horizon yields the current year.
pub fn random_expiry<R: Rng + ?Sized>(rng: &mut R, today: YearMonth, horizon_years: u16) -> ExpiryDate {
    let month = rng.gen_range(1..=12u8);
    let offset = if horizon_years == 0 {
        0
    } else {
        rng.gen_range(0..horizon_years)
    };
    ExpiryDate {
        month,
        year: today.year.saturating_add(offset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn june_2025() -> YearMonth {
        YearMonth::new(2025, 6).unwrap()
    }

    #[test]
    fn test_parse_mm_yy() {
        let expiry = parse_expiry("03/27").unwrap();
        assert_eq!(expiry.month(), 3);
        assert_eq!(expiry.year(), 2027);
        assert_eq!(expiry.to_string(), "03/27");
    }

    #[test]
    fn test_parse_trims() {
        assert!(parse_expiry("  03/27 ").is_ok());
    }

    #[test]
    fn test_strict_format() {
        for bad in ["3/27", "03-27", "0327", "03/2027", "aa/bb", "03/27x"] {
            assert_eq!(parse_expiry(bad), Err(ExpiryError::InvalidFormat), "{}", bad);
        }
        assert_eq!(parse_expiry(""), Err(ExpiryError::Missing));
    }

    #[test]
    fn test_invalid_month() {
        assert_eq!(parse_expiry("00/27"), Err(ExpiryError::InvalidMonth(0)));
        assert_eq!(parse_expiry("13/27"), Err(ExpiryError::InvalidMonth(13)));
    }

    #[test]
    fn test_current_month_is_not_expired() {
        assert!(validate_expiry("06/25", june_2025()).is_ok());
        assert!(validate_expiry("01/26", june_2025()).is_ok());
    }

    #[test]
    fn test_expired() {
        assert_eq!(
            validate_expiry("05/25", june_2025()),
            Err(ExpiryError::Expired { month: 5, year: 2025 })
        );
        assert!(validate_expiry("12/24", june_2025()).is_err());
    }

    #[test]
    fn test_realistic_horizon() {
        let today = june_2025();
        assert!(ExpiryDate::new(12, 2035).unwrap().is_realistic(today, 10));
        assert!(!ExpiryDate::new(1, 2036).unwrap().is_realistic(today, 10));
    }

    #[test]
    fn test_year_month_bounds() {
        assert!(YearMonth::new(2025, 0).is_none());
        assert!(YearMonth::new(2025, 13).is_none());
        let now = YearMonth::current();
        assert!((1..=12).contains(&now.month()));
        assert!(now.year() >= 2024);
    }

    #[test]
    fn test_random_expiry_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let today = june_2025();
        for _ in 0..200 {
            let exp = random_expiry(&mut rng, today, 5);
            assert!((1..=12).contains(&exp.month()));
            assert!((2025..=2029).contains(&exp.year()));
        }
        assert_eq!(random_expiry(&mut rng, today, 0).year(), 2025);
    }
}
