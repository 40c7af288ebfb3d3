//! In-memory BIN database.
//!
//! Entries are kept sorted by range start and found by binary search.
//! Lookups try the 8, 7 and 6 digit prefixes of the query in that order, so
//! a database may mix BIN lengths.

use super::{bin_digits, BinInfo, BinLookup, BinRange, LookupError, MAX_BIN_DIGITS, MIN_BIN_DIGITS};
use crate::card::digits_to_string;
use std::collections::HashMap;

/// In-memory BIN database.
///
/// # Example
///
/// ```
/// use cc_checker::bin::{BinInfo, BinLookup, CardType, MemoryBinDb};
///
/// let mut db = MemoryBinDb::new();
/// db.insert("453201", BinInfo::with_bin("453201").issuer("HSBC Bank").card_type(CardType::Credit));
/// db.insert_range("540100", "540199", BinInfo::with_bin("540100-540199").issuer("İş Bankası"));
///
/// assert_eq!(db.lookup("4532015112830366").unwrap().issuer.as_deref(), Some("HSBC Bank"));
/// assert_eq!(db.lookup("540150").unwrap().issuer.as_deref(), Some("İş Bankası"));
/// assert!(db.lookup("999999").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryBinDb {
    // One sorted table per BIN length (index = length - MIN_BIN_DIGITS).
    tables: [Vec<(BinRange, BinInfo)>; MAX_BIN_DIGITS - MIN_BIN_DIGITS + 1],
    exact_index: Option<HashMap<(usize, u64), usize>>,
}

impl MemoryBinDb {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a single BIN; entries that are not 6-8 digits are ignored.
    pub fn insert(&mut self, bin: &str, info: BinInfo) -> bool {
        self.insert_range(bin, bin, info)
    }

    /// Inserts an inclusive range of equal-length BINs.
    ///
    /// Returns false (and inserts nothing) when the bounds are not 6-8
    /// digits, differ in length, or are reversed.
    pub fn insert_range(&mut self, start: &str, end: &str, info: BinInfo) -> bool {
        let Some((slot, range)) = Self::parse_range(start, end) else {
            return false;
        };
        let table = &mut self.tables[slot];
        let at = table.partition_point(|(r, _)| r < &range);
        table.insert(at, (range, info));
        self.exact_index = None;
        true
    }

    fn parse_range(start: &str, end: &str) -> Option<(usize, BinRange)> {
        let start = start.trim();
        let end = end.trim();
        let len = start.len();
        if len != end.len() || !(MIN_BIN_DIGITS..=MAX_BIN_DIGITS).contains(&len) {
            return None;
        }
        if !start.bytes().chain(end.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        let range = BinRange::new(start.parse().ok()?, end.parse().ok()?);
        if range.start > range.end {
            return None;
        }
        Some((len - MIN_BIN_DIGITS, range))
    }

    /// Builds a hash index over single-BIN entries.
    pub fn build_index(&mut self) {
        let mut index = HashMap::new();
        for (slot, table) in self.tables.iter().enumerate() {
            for (i, (range, _)) in table.iter().enumerate() {
                if range.start == range.end {
                    index.insert((slot, range.start), i);
                }
            }
        }
        self.exact_index = Some(index);
    }

    fn find(&self, slot: usize, bin: u64) -> Option<&BinInfo> {
        let table = &self.tables[slot];
        if let Some(&i) = self.exact_index.as_ref().and_then(|idx| idx.get(&(slot, bin))) {
            return Some(&table[i].1);
        }
        // Last range starting at or before `bin`.
        let upper = table.partition_point(|(r, _)| r.start <= bin);
        table[..upper]
            .iter()
            .rev()
            .find(|(r, _)| r.contains(bin))
            .map(|(_, info)| info)
    }

    /// Looks up digit values (0-9), longest prefix first.
    pub fn get(&self, digits: &[u8]) -> Option<&BinInfo> {
        (MIN_BIN_DIGITS..=MAX_BIN_DIGITS.min(digits.len()))
            .rev()
            .find_map(|len| {
                let bin = digits[..len].iter().fold(0u64, |acc, &d| acc * 10 + u64::from(d));
                self.find(len - MIN_BIN_DIGITS, bin)
            })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.tables.iter().map(Vec::len).sum()
    }

    /// True if the database holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over all entries, shortest BINs first.
    pub fn iter(&self) -> impl Iterator<Item = &(BinRange, BinInfo)> {
        self.tables.iter().flatten()
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.tables.iter_mut().for_each(Vec::clear);
        self.exact_index = None;
    }
}

impl BinLookup for MemoryBinDb {
    fn lookup(&self, bin: &str) -> Result<BinInfo, LookupError> {
        let digits = bin_digits(bin)?;
        self.get(&digits)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(digits_to_string(&digits)))
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Builder for [`MemoryBinDb`].
#[derive(Debug, Default)]
pub struct MemoryBinDbBuilder {
    db: MemoryBinDb,
}

impl MemoryBinDbBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single BIN.
    pub fn add(mut self, bin: &str, info: BinInfo) -> Self {
        self.db.insert(bin, info);
        self
    }

    /// Adds a BIN range.
    pub fn add_range(mut self, start: &str, end: &str, info: BinInfo) -> Self {
        self.db.insert_range(start, end, info);
        self
    }

    /// Finishes the database and indexes single-BIN entries.
    pub fn build(mut self) -> MemoryBinDb {
        self.db.build_index();
        self.db
    }
}
