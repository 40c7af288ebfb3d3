//! Built-in bank/country table.
//!
//! Illustrative data only: a handful of four-digit prefixes per network,
//! used to label generated cards and bulk results. Entries flagged
//! `curated` are the ones the generator draws BINs from.

use super::{bin_digits, BinInfo, BinLookup, LookupError};
use crate::card::{digits_to_string, Network};
use crate::detect::classify_digits;

/// Placeholder for an unknown bank or country.
pub const UNKNOWN: &str = "Unknown";

/// One prefix of the static table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuerEntry {
    /// Four-digit prefix.
    pub prefix: &'static str,
    /// Network the prefix belongs to.
    pub network: Network,
    /// Issuing bank.
    pub bank: &'static str,
    /// ISO country code.
    pub country: &'static str,
    /// Offered to the generator.
    pub curated: bool,
}

const fn entry(
    prefix: &'static str,
    network: Network,
    bank: &'static str,
    country: &'static str,
    curated: bool,
) -> IssuerEntry {
    IssuerEntry {
        prefix,
        network,
        bank,
        country,
        curated,
    }
}

/// The table, grouped by network.
pub static ISSUERS: [IssuerEntry; 46] = [
    entry("4532", Network::Visa, "HSBC Bank", "TR", true),
    entry("4546", Network::Visa, "İş Bankası", "TR", true),
    entry("4157", Network::Visa, "Garanti BBVA", "TR", true),
    entry("4119", Network::Visa, "Akbank", "TR", true),
    entry("4987", Network::Visa, "Yapı Kredi", "TR", true),
    entry("4130", Network::Visa, "QNB Finansbank", "TR", true),
    entry("4766", Network::Visa, "Citibank", "US", true),
    entry("4147", Network::Visa, "Barclays", "GB", true),
    entry("4024", Network::Visa, "Deutsche Bank", "DE", true),
    entry("4628", Network::Visa, "BNP Paribas", "FR", true),
    entry("4025", Network::Visa, "Bank of America", "US", false),
    entry("4067", Network::Visa, "Chase Bank", "US", false),
    entry("4319", Network::Visa, "ING Bank", "NL", false),
    entry("4571", Network::Visa, "Denizbank", "TR", false),
    entry("4462", Network::Visa, "TEB Bank", "TR", false),
    entry("5301", Network::Mastercard, "Ziraat Bankası", "TR", true),
    entry("5492", Network::Mastercard, "Yapı Kredi", "TR", true),
    entry("5269", Network::Mastercard, "Garanti BBVA", "TR", true),
    entry("5170", Network::Mastercard, "Akbank", "TR", true),
    entry("5401", Network::Mastercard, "İş Bankası", "TR", true),
    entry("5426", Network::Mastercard, "Halkbank", "TR", true),
    entry("5411", Network::Mastercard, "Citibank", "US", true),
    entry("5218", Network::Mastercard, "HSBC", "GB", true),
    entry("5315", Network::Mastercard, "Deutsche Bank", "DE", true),
    entry("5407", Network::Mastercard, "BNP Paribas", "FR", true),
    entry("5178", Network::Mastercard, "Citibank", "US", false),
    entry("5262", Network::Mastercard, "HSBC Bank", "GB", false),
    entry("5413", Network::Mastercard, "Deutsche Bank", "DE", false),
    entry("5255", Network::Mastercard, "Bank of America", "US", false),
    entry("5567", Network::Mastercard, "Chase Bank", "US", false),
    entry("5384", Network::Mastercard, "ING Bank", "NL", false),
    entry("5456", Network::Mastercard, "Wells Fargo", "US", false),
    entry("3400", Network::Amex, "American Express", "US", true),
    entry("3700", Network::Amex, "American Express", "US", true),
    entry("3734", Network::Amex, "American Express", "GB", true),
    entry("3764", Network::Amex, "American Express", "TR", true),
    entry("6011", Network::Discover, "Discover", "US", true),
    entry("6446", Network::Discover, "Discover", "US", true),
    entry("6510", Network::Discover, "Discover", "US", true),
    entry("3001", Network::Diners, "Diners Club", "US", true),
    entry("3056", Network::Diners, "Diners Club", "GB", true),
    entry("3634", Network::Diners, "Diners Club", "TR", true),
    entry("3896", Network::Diners, "Diners Club", "DE", true),
    entry("3528", Network::Jcb, "JCB", "JP", true),
    entry("3554", Network::Jcb, "JCB", "JP", true),
    entry("3589", Network::Jcb, "JCB", "JP", true),
];

/// Bank and country attributed to a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Issuer {
    /// Bank name, or [`UNKNOWN`].
    pub bank: &'static str,
    /// Country code, or [`UNKNOWN`].
    pub country: &'static str,
}

impl Issuer {
    const UNKNOWN: Issuer = Issuer {
        bank: UNKNOWN,
        country: UNKNOWN,
    };

    /// True if neither bank nor country is known.
    pub fn is_unknown(&self) -> bool {
        self.bank == UNKNOWN && self.country == UNKNOWN
    }

    fn network_default(network: Network) -> Self {
        match network {
            Network::Visa => Issuer {
                bank: UNKNOWN,
                country: "US",
            },
            Network::Discover => Issuer {
                bank: "Discover",
                country: "US",
            },
            Network::Jcb => Issuer {
                bank: "JCB",
                country: "JP",
            },
            Network::Diners => Issuer {
                bank: "Diners Club",
                country: "US",
            },
            _ => Self::UNKNOWN,
        }
    }
}

/// Lookup over [`ISSUERS`]; always available, never fails in transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticBinTable;

impl StaticBinTable {
    /// Creates the table handle.
    pub fn new() -> Self {
        Self
    }

    /// Entries the generator may draw from for `network`.
    pub fn curated(network: Network) -> impl Iterator<Item = &'static IssuerEntry> {
        ISSUERS
            .iter()
            .filter(move |e| e.curated && e.network == network)
    }

    /// Attributes a bank and country to a number by its network and prefix.
    ///
    /// ```
    /// use cc_checker::bin::StaticBinTable;
    ///
    /// let issuer = StaticBinTable::issuer_for(&[5, 2, 5, 5, 9, 3, 9, 1]);
    /// assert_eq!(issuer.bank, "Bank of America");
    /// assert_eq!(issuer.country, "US");
    /// ```
    pub fn issuer_for(digits: &[u8]) -> Issuer {
        let Some(classification) = classify_digits(digits) else {
            return Issuer::UNKNOWN;
        };
        let network = classification.network;
        let prefix = digits_to_string(&digits[..digits.len().min(4)]);

        ISSUERS
            .iter()
            .find(|e| e.network == network && e.prefix == prefix)
            .map(|e| Issuer {
                bank: e.bank,
                country: e.country,
            })
            .unwrap_or_else(|| Issuer::network_default(network))
    }
}

impl BinLookup for StaticBinTable {
    fn lookup(&self, bin: &str) -> Result<BinInfo, LookupError> {
        let digits = bin_digits(bin)?;
        let bin_str = digits_to_string(&digits);
        let network = classify_digits(&digits)
            .map(|c| c.network)
            .ok_or_else(|| LookupError::NotFound(bin_str.clone()))?;

        let issuer = Self::issuer_for(&digits);
        if issuer.is_unknown() {
            return Err(LookupError::NotFound(bin_str));
        }

        let mut info = BinInfo::with_bin(bin_str)
            .brand(network.display_name())
            .country(issuer.country);
        if issuer.bank != UNKNOWN {
            info = info.issuer(issuer.bank);
        }
        Ok(info)
    }

    fn name(&self) -> &str {
        "static-table"
    }
}
