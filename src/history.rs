//! Bounded log of recent checks, most recent first.
//!
//! # Example
//!
//! ```
//! use cc_checker::history::{CheckHistory, CheckRecord};
//! use cc_checker::{validate, ValidateOptions, YearMonth};
//!
//! let today = YearMonth::new(2025, 6).unwrap();
//! let mut history = CheckHistory::new(2);
//!
//! for number in ["4532015112830366", "5425233430109903", "378282246310005"] {
//!     let verdict = validate(number, &ValidateOptions::new(), today);
//!     history.record(CheckRecord::new(number, verdict));
//! }
//!
//! assert_eq!(history.len(), 2);
//! assert_eq!(history.latest().unwrap().last_four(), "0005");
//! ```

use crate::card::{CardNumber, Network};
use crate::validate::ValidationVerdict;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use tracing::info;

/// One entry of the check history.
#[derive(Debug, Clone)]
pub struct CheckRecord {
    number: Option<CardNumber>,
    /// Detected network, if any.
    pub network: Option<Network>,
    /// When the check completed.
    pub timestamp: DateTime<Utc>,
    /// The verdict that was returned.
    pub verdict: ValidationVerdict,
}

impl CheckRecord {
    /// Creates a record stamped with the current time.
    pub fn new(input: &str, verdict: ValidationVerdict) -> Self {
        Self::at(input, verdict, Utc::now())
    }

    /// Creates a record with an explicit timestamp.
    pub fn at(input: &str, verdict: ValidationVerdict, timestamp: DateTime<Utc>) -> Self {
        Self {
            number: CardNumber::parse(input),
            network: verdict.network,
            timestamp,
            verdict,
        }
    }

    /// The checked number, when it held 1-19 digits.
    pub fn number(&self) -> Option<&CardNumber> {
        self.number.as_ref()
    }

    /// Masked number for display.
    pub fn masked(&self) -> String {
        self.number.as_ref().map(CardNumber::masked).unwrap_or_default()
    }

    /// Last four digits for display.
    pub fn last_four(&self) -> String {
        self.number.as_ref().map(CardNumber::last_four).unwrap_or_default()
    }

    /// Whether the check passed.
    #[inline]
    pub fn ok(&self) -> bool {
        self.verdict.ok
    }
}

/// Fixed-capacity history with FIFO eviction of the oldest entry.
#[derive(Debug, Clone)]
pub struct CheckHistory {
    records: VecDeque<CheckRecord>,
    capacity: usize,
}

impl Default for CheckHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl CheckHistory {
    /// Capacity used by `Default`.
    pub const DEFAULT_CAPACITY: usize = 10;

    /// Creates an empty history; a zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepends a record, evicting the oldest beyond capacity.
    pub fn record(&mut self, record: CheckRecord) {
        info!(
            card = %record.masked(),
            network = ?record.network,
            ok = record.ok(),
            "check recorded"
        );
        self.records.push_front(record);
        self.records.truncate(self.capacity);
    }

    /// Records, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &CheckRecord> {
        self.records.iter()
    }

    /// The most recent record.
    pub fn latest(&self) -> Option<&CheckRecord> {
        self.records.front()
    }

    /// Number of stored records.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum number of records kept.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
