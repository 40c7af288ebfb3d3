//! CSV BIN loader (`bin-csv` feature).
//!
//! ```csv
//! bin,issuer,card_type,card_level,country,country_name,brand,bank_phone,bank_url
//! 453201,HSBC Bank,credit,classic,TR,Turkey,Visa,,
//! ```
//!
//! Headers are matched case-insensitively, in any order; only `bin` (or
//! `bin_start` plus `bin_end` for ranges) is required.

use super::{BinDbError, BinInfo, CardLevel, CardType, MemoryBinDb};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Loads CSV BIN data into a [`MemoryBinDb`].
pub struct CsvBinLoader;

impl CsvBinLoader {
    /// Loads a comma-separated file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<MemoryBinDb, BinDbError> {
        Self::from_reader_with_delimiter(std::fs::File::open(path)?, b',')
    }

    /// Loads comma-separated data from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<MemoryBinDb, BinDbError> {
        Self::from_reader_with_delimiter(reader, b',')
    }

    /// Loads comma-separated text.
    pub fn parse(csv: &str) -> Result<MemoryBinDb, BinDbError> {
        Self::from_reader(csv.as_bytes())
    }

    /// Loads data with a custom delimiter, such as `b';'` or `b'\t'`.
    pub fn from_reader_with_delimiter<R: Read>(
        reader: R,
        delimiter: u8,
    ) -> Result<MemoryBinDb, BinDbError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| BinDbError::ParseError(format!("failed to read CSV headers: {}", e)))?;
        let columns = Columns::from_headers(headers)?;

        let mut db = MemoryBinDb::new();
        let mut skipped = 0usize;
        for record in csv_reader.records() {
            let record =
                record.map_err(|e| BinDbError::ParseError(format!("CSV parse error: {}", e)))?;
            let inserted = columns
                .bounds(&record)
                .map(|(start, end)| db.insert_range(start, end, columns.info(&record)))
                .unwrap_or(false);
            if !inserted {
                skipped += 1;
            }
        }
        if skipped > 0 {
            debug!(skipped, "skipped CSV rows without a usable BIN");
        }
        Ok(db)
    }
}

#[derive(Default)]
struct Columns {
    bin: Option<usize>,
    bin_start: Option<usize>,
    bin_end: Option<usize>,
    issuer: Option<usize>,
    card_type: Option<usize>,
    card_level: Option<usize>,
    country: Option<usize>,
    country_name: Option<usize>,
    brand: Option<usize>,
    bank_phone: Option<usize>,
    bank_url: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, BinDbError> {
        let mut cols = Self::default();
        for (i, header) in headers.iter().enumerate() {
            let slot = match header.trim().to_lowercase().as_str() {
                "bin" | "iin" => &mut cols.bin,
                "bin_start" | "start" => &mut cols.bin_start,
                "bin_end" | "end" => &mut cols.bin_end,
                "issuer" | "bank" | "bank_name" | "issuer_name" => &mut cols.issuer,
                "card_type" | "type" | "cardtype" => &mut cols.card_type,
                "card_level" | "level" | "tier" | "cardlevel" => &mut cols.card_level,
                "country" | "country_code" => &mut cols.country,
                "country_name" => &mut cols.country_name,
                "brand" | "scheme" | "network" => &mut cols.brand,
                "bank_phone" | "phone" => &mut cols.bank_phone,
                "bank_url" | "url" | "website" => &mut cols.bank_url,
                _ => continue,
            };
            *slot = Some(i);
        }

        let has_range = cols.bin_start.is_some() && cols.bin_end.is_some();
        if cols.bin.is_none() && !has_range {
            return Err(BinDbError::ParseError(
                "missing required 'bin' column".to_string(),
            ));
        }
        Ok(cols)
    }

    fn field<'r>(&self, record: &'r csv::StringRecord, idx: Option<usize>) -> Option<&'r str> {
        idx.and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn bounds<'r>(&self, record: &'r csv::StringRecord) -> Option<(&'r str, &'r str)> {
        if let Some(bin) = self.field(record, self.bin) {
            return Some((bin, bin));
        }
        Some((
            self.field(record, self.bin_start)?,
            self.field(record, self.bin_end)?,
        ))
    }

    fn info(&self, record: &csv::StringRecord) -> BinInfo {
        let owned = |idx| self.field(record, idx).map(str::to_string);
        let bin = match self.bounds(record) {
            Some((start, end)) if start != end => format!("{}-{}", start, end),
            Some((start, _)) => start.to_string(),
            None => String::new(),
        };
        BinInfo {
            bin,
            issuer: owned(self.issuer),
            card_type: self.field(record, self.card_type).map(CardType::from_label),
            card_level: self.field(record, self.card_level).map(CardLevel::from_label),
            country: owned(self.country).map(|c| c.to_uppercase()),
            country_name: owned(self.country_name),
            brand: owned(self.brand),
            bank_phone: owned(self.bank_phone),
            bank_url: owned(self.bank_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bin::BinLookup;

    #[test]
    fn test_basic_csv() {
        let csv = "bin,issuer,card_type,country\n\
                   453201,HSBC Bank,credit,tr\n\
                   530112,Ziraat Bankası,debit,TR\n";
        let db = CsvBinLoader::parse(csv).unwrap();
        assert_eq!(db.len(), 2);

        let info = db.lookup("453201").unwrap();
        assert_eq!(info.issuer.as_deref(), Some("HSBC Bank"));
        assert_eq!(info.card_type, Some(CardType::Credit));
        assert_eq!(info.country.as_deref(), Some("TR"));
    }

    #[test]
    fn test_header_aliases_any_order() {
        let csv = "Country_Code,BANK,IIN,Scheme,Tier\nGB,HSBC,521800,MasterCard,platinum\n";
        let info = CsvBinLoader::parse(csv).unwrap().lookup("521800").unwrap();
        assert_eq!(info.issuer.as_deref(), Some("HSBC"));
        assert_eq!(info.brand.as_deref(), Some("MasterCard"));
        assert_eq!(info.card_level, Some(CardLevel::Platinum));
    }

    #[test]
    fn test_range_columns() {
        let csv = "bin_start,bin_end,issuer\n352800,358999,JCB\n";
        let db = CsvBinLoader::parse(csv).unwrap();
        let info = db.lookup("3530111333300000").unwrap();
        assert_eq!(info.issuer.as_deref(), Some("JCB"));
        assert_eq!(info.bin, "352800-358999");
    }

    #[test]
    fn test_semicolon_delimiter() {
        let csv = "bin;issuer\n601100;Discover\n";
        let db = CsvBinLoader::from_reader_with_delimiter(csv.as_bytes(), b';').unwrap();
        assert_eq!(db.lookup("601100").unwrap().issuer.as_deref(), Some("Discover"));
    }

    #[test]
    fn test_rows_without_bin_skipped() {
        let csv = "bin,issuer\n,Nobody\n45,Too Short\n453201,HSBC Bank\n";
        assert_eq!(CsvBinLoader::parse(csv).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_bin_column() {
        assert!(matches!(
            CsvBinLoader::parse("issuer,country\nBank,US\n"),
            Err(BinDbError::ParseError(_))
        ));
    }
}
