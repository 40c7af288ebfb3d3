//! Fuzz target for expiry date parsing.
//!
//! Tests that expiry parsing never panics on arbitrary input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use cc_checker::expiry;
use cc_checker::YearMonth;

fuzz_target!(|data: &str| {
    let Some(today) = YearMonth::new(2025, 6) else {
        return;
    };

    let _ = expiry::validate_expiry(data, today);

    if let Ok(exp) = expiry::parse_expiry(data) {
        assert!((1..=12).contains(&exp.month()));
        assert_eq!(exp.format_short(), exp.to_string());
        let _ = exp.is_expired(today);
        let _ = exp.is_realistic(today, 10);

        // Strict MM/YY round-trips through its own formatting.
        let reparsed = expiry::parse_expiry(&exp.format_short());
        assert_eq!(reparsed.ok(), Some(exp));
    }
});
