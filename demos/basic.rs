//! Basic card validation example.
//!
//! Run with: `cargo run --example basic`

use cc_checker::{
    catalog::CATALOG, classify, classify_bin, cvv, is_valid, validate, ReasonCode,
    ValidateOptions, YearMonth,
};

fn main() {
    println!("=== Basic Card Validation ===\n");
    let today = YearMonth::current();

    // Example 1: Validate a Visa card
    let visa_number = "4111-1111-1111-1111";
    println!("Validating: {}", visa_number);

    match cc_checker::check_number(visa_number) {
        Ok(card) => {
            println!("  Valid: yes");
            println!("  Network: {}", card.network());
            println!("  Label: {}", card.classification().label);
            println!("  Last Four: {}", card.number().last_four());
            println!("  BIN (6): {}", card.number().bin(6));
            println!("  Masked: {}", card.number().masked());
            println!("  Length: {} digits", card.number().len());
        }
        Err(e) => {
            println!("  Valid: no");
            println!("  Error: {}", e);
        }
    }
    println!();

    // Example 2: Quick boolean check
    let test_cards = [
        ("4111111111111111", "Visa"),
        ("5555555555554444", "MasterCard"),
        ("378282246310005", "Amex"),
        ("6011111111111117", "Discover"),
        ("6200000000000000", "UnionPay (no Luhn digit)"),
        ("4111111111111112", "Invalid (bad checksum)"),
    ];

    println!("Quick validation checks:");
    for (number, description) in test_cards {
        println!(
            "  {} - {}: {}",
            number,
            description,
            if is_valid(number) { "VALID" } else { "INVALID" }
        );
    }
    println!();

    // Example 3: Reason codes
    println!("Rejection examples:");

    let error_cases = [
        ("", "Empty input"),
        ("9999999999999995", "Unknown network"),
        ("491659228999391", "Wrong length for Visa"),
        ("4111111111111112", "Invalid checksum"),
    ];

    for (number, description) in error_cases {
        let verdict = validate(number, &ValidateOptions::new(), today);
        let code = verdict.reason_code.map_or("-", |c| c.as_str());
        println!("  {}: {} - {}", description, code, verdict.message);
    }
    println!();

    // Example 4: Simulated live check
    println!("Live check:");
    let live_cases = [
        ("378282246310005", "12/30", "1234"),
        ("378282246310005", "12/30", "123"),
        ("4111111111111111", "01/20", "123"),
        ("4111111111111111", "12/99", "123"),
    ];
    for (number, expiry, code) in live_cases {
        let verdict = validate(number, &ValidateOptions::live(expiry, code), today);
        match verdict.reason_code {
            None => println!("  {} {} {}: {}", number, expiry, code, verdict.message),
            Some(ReasonCode::BadExpiry | ReasonCode::BadCvv) => {
                println!("  {} {} {}: rejected - {}", number, expiry, code, verdict.message)
            }
            Some(other) => println!("  {} {} {}: {}", number, expiry, code, other),
        }
    }
    println!();

    // Example 5: Prefix detection while typing
    println!("Detection as digits arrive:");
    for partial in ["3", "37", "6011", "6221", "622126", "62"] {
        let network = classify(partial).map_or("?".to_string(), |c| c.label.to_string());
        println!("  {:8} -> {}", partial, network);
    }
    if let Some(check) = classify_bin("522222") {
        println!("  BIN {} valid: {}", check.bin, check.valid);
    }
    println!();

    // Example 6: The catalog
    println!("Supported networks:");
    for spec in CATALOG.iter() {
        let lengths: Vec<String> = spec.valid_lengths.iter().map(|l| l.to_string()).collect();
        println!(
            "  {:16} - Lengths: {:15} CVV: {} digits  Luhn: {}",
            spec.display_name,
            lengths.join(", "),
            cvv::cvv_length_for(spec.network),
            if spec.uses_checksum { "yes" } else { "no" }
        );
    }
}
