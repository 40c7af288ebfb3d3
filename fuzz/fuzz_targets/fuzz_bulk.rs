//! Fuzz target for bulk text parsing.
//!
//! Tests that the bulk parser never panics and keeps its line counts
//! consistent.

#![no_main]

use libfuzzer_sys::fuzz_target;
use cc_checker::bulk::{normalize_expiry, parse_bulk, parse_line, Filter};
use cc_checker::YearMonth;

fuzz_target!(|data: &str| {
    let Some(today) = YearMonth::new(2025, 6) else {
        return;
    };

    let report = parse_bulk(data, today);
    let summary = report.summary();
    assert_eq!(summary.total, report.results.len());
    assert_eq!(summary.valid + summary.invalid, summary.total);
    assert_eq!(report.lines_read, summary.total + report.dropped);

    let _ = report.to_text(Filter::All);
    let _ = report.to_text(Filter::Valid);

    for line in data.lines() {
        if let Some(entry) = parse_line(line, today) {
            assert!(!entry.number.is_empty());
            assert!(entry.number.bytes().all(|b| b.is_ascii_digit()));
        }
        let _ = normalize_expiry(line, today);
    }
});
