//! BIN (Bank Identification Number) metadata.
//!
//! [`BinLookup`] is the seam for an issuer-metadata service. The crate ships
//! several implementations:
//!
//! - [`StaticBinTable`] - the built-in illustrative bank/country table
//! - [`MemoryBinDb`] - in-memory range database
//! - `JsonBinLoader` / `CsvBinLoader` - file loaders into a `MemoryBinDb`
//!   (`bin-json`, `bin-csv` features)
//! - `SqliteBinDb` - SQLite-backed lookup (`bin-sqlite` feature)
//! - [`FallbackLookup`] - tries a primary service, degrades to the static table
//!
//! # Example
//!
//! ```
//! use cc_checker::bin::{BinInfo, BinLookup, FallbackLookup, MemoryBinDbBuilder};
//!
//! let db = MemoryBinDbBuilder::new()
//!     .add("411111", BinInfo::with_bin("411111").issuer("Test Bank").country("US"))
//!     .build();
//!
//! let info = db.lookup("411111").unwrap();
//! assert_eq!(info.issuer.as_deref(), Some("Test Bank"));
//!
//! // Unknown to the primary, answered by the static table.
//! let lookup = FallbackLookup::new(db);
//! let info = lookup.lookup("453201").unwrap();
//! assert_eq!(info.issuer.as_deref(), Some("HSBC Bank"));
//! ```

mod fallback;
mod memory;
mod static_table;

#[cfg(feature = "bin-json")]
mod json;

#[cfg(feature = "bin-csv")]
mod csv;

#[cfg(feature = "bin-sqlite")]
mod sqlite;

pub use fallback::FallbackLookup;
pub use memory::{MemoryBinDb, MemoryBinDbBuilder};
pub use static_table::{Issuer, IssuerEntry, StaticBinTable, ISSUERS, UNKNOWN};

#[cfg(feature = "bin-json")]
pub use json::JsonBinLoader;

#[cfg(feature = "bin-csv")]
pub use csv::CsvBinLoader;

#[cfg(feature = "bin-sqlite")]
pub use sqlite::SqliteBinDb;

use crate::card::extract_digits;
use crate::error::ReasonCode;
use std::fmt;

/// Shortest BIN accepted by a lookup.
pub const MIN_BIN_DIGITS: usize = 6;
/// Longest BIN consulted by a lookup; extra digits are ignored.
pub const MAX_BIN_DIGITS: usize = 8;

/// An issuer-metadata service keyed by BIN.
///
/// Implementations must be shareable across threads; the REST server holds
/// one behind an `Arc`.
pub trait BinLookup: Send + Sync {
    /// Looks up the issuer of a 6-8 digit BIN.
    ///
    /// Separators are ignored and digits past the eighth are dropped, so a
    /// full card number may be passed.
    fn lookup(&self, bin: &str) -> Result<BinInfo, LookupError>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "bin-lookup"
    }
}

impl<T: BinLookup + ?Sized> BinLookup for Box<T> {
    fn lookup(&self, bin: &str) -> Result<BinInfo, LookupError> {
        (**self).lookup(bin)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: BinLookup + ?Sized> BinLookup for std::sync::Arc<T> {
    fn lookup(&self, bin: &str) -> Result<BinInfo, LookupError> {
        (**self).lookup(bin)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Extracts the digits of a BIN, keeping at most [`MAX_BIN_DIGITS`].
///
/// ```
/// use cc_checker::bin::{bin_digits, LookupError};
///
/// assert_eq!(bin_digits("4532-0151 1283").unwrap(), vec![4, 5, 3, 2, 0, 1, 5, 1]);
/// assert!(matches!(bin_digits("4532"), Err(LookupError::InvalidBin(_))));
/// assert!(matches!(bin_digits("45x201"), Err(LookupError::InvalidBin(_))));
/// ```
pub fn bin_digits(bin: &str) -> Result<Vec<u8>, LookupError> {
    if bin.chars().any(|c| !(c.is_ascii_digit() || c == ' ' || c == '-')) {
        return Err(LookupError::InvalidBin(bin.to_string()));
    }
    let mut digits = extract_digits(bin);
    if digits.len() < MIN_BIN_DIGITS {
        return Err(LookupError::InvalidBin(bin.to_string()));
    }
    digits.truncate(MAX_BIN_DIGITS);
    Ok(digits)
}

/// Why a BIN lookup failed.
///
/// Every variant is reported to callers as [`ReasonCode::LookupFailed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Not a 6-8 digit BIN.
    InvalidBin(String),
    /// The service has no entry for the BIN.
    NotFound(String),
    /// The service could not be reached or answered with an error.
    Transport(String),
}

impl LookupError {
    /// The reason code reported for this failure.
    #[inline]
    pub const fn code(&self) -> ReasonCode {
        ReasonCode::LookupFailed
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBin(bin) => write!(f, "invalid BIN '{}': expected 6-8 digits", bin),
            Self::NotFound(bin) => write!(f, "no issuer found for BIN {}", bin),
            Self::Transport(msg) => write!(f, "BIN lookup failed: {}", msg),
        }
    }
}

impl std::error::Error for LookupError {}

/// Issuer metadata for a BIN.
///
/// All fields but `bin` are optional since sources differ in coverage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinInfo {
    /// The BIN (or BIN range) this entry applies to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub bin: String,

    /// Issuing bank.
    #[cfg_attr(feature = "serde", serde(default))]
    pub issuer: Option<String>,

    /// Credit, debit, prepaid...
    #[cfg_attr(feature = "serde", serde(default))]
    pub card_type: Option<CardType>,

    /// Product tier.
    #[cfg_attr(feature = "serde", serde(default))]
    pub card_level: Option<CardLevel>,

    /// ISO 3166-1 alpha-2 country code of the issuer.
    #[cfg_attr(feature = "serde", serde(default))]
    pub country: Option<String>,

    /// Full country name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub country_name: Option<String>,

    /// Card network name.
    #[cfg_attr(feature = "serde", serde(default))]
    pub brand: Option<String>,

    /// Issuer customer service phone.
    #[cfg_attr(feature = "serde", serde(default))]
    pub bank_phone: Option<String>,

    /// Issuer website.
    #[cfg_attr(feature = "serde", serde(default))]
    pub bank_url: Option<String>,
}

impl BinInfo {
    /// Creates an entry for `bin` with no metadata.
    pub fn with_bin(bin: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            ..Default::default()
        }
    }

    /// Sets the issuer.
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Sets the card type.
    pub fn card_type(mut self, card_type: CardType) -> Self {
        self.card_type = Some(card_type);
        self
    }

    /// Sets the card level.
    pub fn card_level(mut self, card_level: CardLevel) -> Self {
        self.card_level = Some(card_level);
        self
    }

    /// Sets the country code.
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Sets the network name.
    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }
}

/// Type of payment card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardType {
    /// Credit card.
    Credit,
    /// Debit card.
    Debit,
    /// Prepaid card.
    Prepaid,
    /// Charge card, paid in full each month.
    Charge,
    /// Corporate or business card.
    Corporate,
    /// Not known.
    #[default]
    Unknown,
}

impl CardType {
    /// Reads a loosely written type name; anything unrecognized is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "credit" => Self::Credit,
            "debit" => Self::Debit,
            "prepaid" => Self::Prepaid,
            "charge" => Self::Charge,
            "corporate" | "business" => Self::Corporate,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Credit => "Credit",
            Self::Debit => "Debit",
            Self::Prepaid => "Prepaid",
            Self::Charge => "Charge",
            Self::Corporate => "Corporate",
            Self::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Card product tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardLevel {
    /// Standard or classic.
    Standard,
    /// Gold.
    Gold,
    /// Platinum.
    Platinum,
    /// Signature or premium.
    Signature,
    /// Infinite or black.
    Infinite,
    /// Business.
    Business,
    /// Corporate.
    Corporate,
    /// World or World Elite.
    World,
    /// Not known.
    #[default]
    Unknown,
}

impl CardLevel {
    /// Reads a loosely written tier name; anything unrecognized is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "standard" | "classic" => Self::Standard,
            "gold" => Self::Gold,
            "platinum" => Self::Platinum,
            "signature" | "premium" => Self::Signature,
            "infinite" | "black" => Self::Infinite,
            "business" => Self::Business,
            "corporate" => Self::Corporate,
            "world" | "world elite" => Self::World,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for CardLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Standard => "Standard",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
            Self::Signature => "Signature",
            Self::Infinite => "Infinite",
            Self::Business => "Business",
            Self::Corporate => "Corporate",
            Self::World => "World",
            Self::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// An inclusive range of BINs of equal length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinRange {
    /// First BIN in the range.
    pub start: u64,
    /// Last BIN in the range.
    pub end: u64,
}

impl BinRange {
    /// Creates a range.
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// A range holding one BIN.
    pub fn single(bin: u64) -> Self {
        Self::new(bin, bin)
    }

    /// True if `bin` lies in the range.
    #[inline]
    pub fn contains(&self, bin: u64) -> bool {
        (self.start..=self.end).contains(&bin)
    }

    /// Parses the digits of a BIN string, ignoring separators.
    pub fn parse_bin(bin: &str) -> Option<u64> {
        bin.chars()
            .filter(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .ok()
    }
}

impl PartialOrd for BinRange {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BinRange {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.start.cmp(&other.start).then(self.end.cmp(&other.end))
    }
}

/// Error type for loading BIN data.
#[derive(Debug)]
pub enum BinDbError {
    /// Failed to read the source.
    IoError(std::io::Error),
    /// The source is not in a supported format.
    ParseError(String),
    /// The database is unusable.
    InvalidDatabase(String),
}

impl fmt::Display for BinDbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {}", e),
            Self::ParseError(s) => write!(f, "Parse error: {}", s),
            Self::InvalidDatabase(s) => write!(f, "Invalid database: {}", s),
        }
    }
}

impl std::error::Error for BinDbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BinDbError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err)
    }
}
