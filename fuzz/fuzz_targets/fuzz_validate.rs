//! Fuzz target for card validation.
//!
//! Tests that validation never panics on arbitrary input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use cc_checker::{check_number, classify, classify_bin, is_valid, validate, ValidateOptions, YearMonth};

fuzz_target!(|data: &str| {
    let Some(today) = YearMonth::new(2025, 6) else {
        return;
    };

    let verdict = validate(data, &ValidateOptions::new(), today);
    assert_eq!(verdict.ok, is_valid(data));
    assert_eq!(verdict.ok, verdict.reason_code.is_none());

    let _ = classify(data);
    let _ = classify_bin(data);
    if let Ok(card) = check_number(data) {
        assert!(!format!("{:?}", card).contains(&card.number().number()));
    }

    // Treat the input as "number|expiry|cvv" for the live path.
    let mut parts = data.splitn(3, '|');
    let number = parts.next().unwrap_or_default();
    let options = ValidateOptions::live(parts.next().unwrap_or_default(), parts.next().unwrap_or_default());
    let verdict = validate(number, &options, today);
    if verdict.ok {
        assert!(verdict.score.is_some());
    }
});
