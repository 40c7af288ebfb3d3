//! JSON BIN loader (`bin-json` feature).
//!
//! Two layouts are accepted. An array of entries:
//!
//! ```json
//! [
//!   { "bin": "453201", "issuer": "HSBC Bank", "card_type": "Credit", "country": "TR" },
//!   { "bin": "540100-540199", "bank": "İş Bankası", "country_code": "TR" }
//! ]
//! ```
//!
//! or an object keyed by BIN:
//!
//! ```json
//! { "453201": { "issuer": "HSBC Bank" } }
//! ```
//!
//! A `bin` of the form `start-end` inserts a range.

use super::{BinDbError, BinInfo, CardLevel, CardType, MemoryBinDb};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Loads JSON BIN data into a [`MemoryBinDb`].
pub struct JsonBinLoader;

impl JsonBinLoader {
    /// Loads a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<MemoryBinDb, BinDbError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Loads JSON from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<MemoryBinDb, BinDbError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::parse(&content)
    }

    /// Loads JSON text in either layout.
    pub fn parse(json: &str) -> Result<MemoryBinDb, BinDbError> {
        let entries: Vec<JsonBinEntry> = match json.trim_start().as_bytes().first() {
            Some(b'[') => serde_json::from_str(json).map_err(parse_error)?,
            Some(b'{') => {
                let map: BTreeMap<String, JsonBinEntry> =
                    serde_json::from_str(json).map_err(parse_error)?;
                map.into_iter()
                    .map(|(key, mut entry)| {
                        if entry.bin.is_empty() {
                            entry.bin = key;
                        }
                        entry
                    })
                    .collect()
            }
            _ => {
                return Err(BinDbError::ParseError(
                    "expected a JSON array or object".to_string(),
                ))
            }
        };

        let mut db = MemoryBinDb::new();
        let mut skipped = 0usize;
        for entry in entries {
            let bin = entry.bin.clone();
            let (start, end) = bin.split_once('-').unwrap_or((bin.as_str(), bin.as_str()));
            if !db.insert_range(start, end, entry.into_bin_info()) {
                skipped += 1;
            }
        }
        if skipped > 0 {
            debug!(skipped, "skipped JSON BIN entries with malformed BINs");
        }
        Ok(db)
    }
}

fn parse_error(e: serde_json::Error) -> BinDbError {
    BinDbError::ParseError(format!("JSON parse error: {}", e))
}

#[derive(Debug, Deserialize, Default)]
struct JsonBinEntry {
    #[serde(default, alias = "iin")]
    bin: String,
    #[serde(default, alias = "bank", alias = "bank_name")]
    issuer: Option<String>,
    #[serde(default, alias = "type")]
    card_type: Option<String>,
    #[serde(default, alias = "level", alias = "tier")]
    card_level: Option<String>,
    #[serde(default, alias = "country_code")]
    country: Option<String>,
    #[serde(default)]
    country_name: Option<String>,
    #[serde(default, alias = "scheme", alias = "network")]
    brand: Option<String>,
    #[serde(default, alias = "phone")]
    bank_phone: Option<String>,
    #[serde(default, alias = "url", alias = "website")]
    bank_url: Option<String>,
}

impl JsonBinEntry {
    fn into_bin_info(self) -> BinInfo {
        BinInfo {
            bin: self.bin,
            issuer: self.issuer,
            card_type: self.card_type.as_deref().map(CardType::from_label),
            card_level: self.card_level.as_deref().map(CardLevel::from_label),
            country: self.country.map(|c| c.to_uppercase()),
            country_name: self.country_name,
            brand: self.brand,
            bank_phone: self.bank_phone,
            bank_url: self.bank_url,
        }
    }
}
