//! Property-based tests using proptest.
//!
//! These tests verify invariants that should hold for all inputs,
//! helping discover edge cases that manual tests might miss.

use cc_checker::{
    bulk::parse_bulk,
    classify, cvv,
    expiry::{parse_expiry, random_expiry},
    format::{self, strip_non_digits},
    generate::generate_for,
    is_valid, luhn, mask, validate, CardNumber, CheckerConfig, Network, ValidateOptions, YearMonth,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// =============================================================================
// STRATEGIES
// =============================================================================

/// Any of the eight networks.
fn network_strategy() -> impl Strategy<Value = Network> {
    prop::sample::select(Network::ALL.to_vec())
}

/// Generates a random digit string of a length within range.
fn digit_string_range(range: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = String> {
    range.prop_flat_map(|len| {
        proptest::collection::vec(prop::char::range('0', '9'), len)
            .prop_map(|chars| chars.into_iter().collect::<String>())
    })
}

/// A month-year between 2020 and 2040.
fn today_strategy() -> impl Strategy<Value = YearMonth> {
    (2020u16..2040, 1u8..=12).prop_map(|(y, m)| YearMonth::new(y, m).unwrap())
}

/// Inserts separators between the characters of `card`.
fn card_with_separators(card: String) -> impl Strategy<Value = String> {
    let len = card.len();
    proptest::collection::vec(
        prop_oneof![Just(""), Just(" "), Just("-"), Just("."), Just(" - ")],
        len + 1,
    )
    .prop_map(move |seps| {
        let mut result = String::new();
        for (i, c) in card.chars().enumerate() {
            result.push_str(seps[i]);
            result.push(c);
        }
        result.push_str(seps[len]);
        result
    })
}

fn today() -> YearMonth {
    YearMonth::new(2025, 6).unwrap()
}

// =============================================================================
// LUHN ALGORITHM PROPERTIES
// =============================================================================

proptest! {
    /// Property: appending the computed check digit always yields a valid number.
    #[test]
    fn check_digit_completes_any_prefix(partial in digit_string_range(1..=18)) {
        let check = luhn::luhn_check_digit(&partial);
        prop_assert!(check <= 9);
        let full = format!("{}{}", partial, check);
        prop_assert!(luhn::luhn_valid(&full), "{} should pass Luhn", full);
    }

    /// Property: exactly one check digit completes a prefix.
    #[test]
    fn check_digit_is_unique(partial in digit_string_range(1..=18)) {
        let valid: Vec<u8> = (0..10u8)
            .filter(|d| luhn::luhn_valid(&format!("{}{}", partial, d)))
            .collect();
        prop_assert_eq!(valid, vec![luhn::luhn_check_digit(&partial)]);
    }

    /// Property: separators never change the Luhn result.
    #[test]
    fn luhn_ignores_separators(
        (raw, formatted) in digit_string_range(2..=19)
            .prop_flat_map(|s| (Just(s.clone()), card_with_separators(s)))
    ) {
        prop_assert_eq!(luhn::luhn_valid(&raw), luhn::luhn_valid(&formatted));
    }
}

// =============================================================================
// GENERATOR PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: a generated number passes validation for the requested network.
    #[test]
    fn generated_cards_validate(network in network_strategy(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let card = generate_for(network, &mut rng, today(), &CheckerConfig::default());

        prop_assert_eq!(card.cvv.len(), cvv::cvv_length_for(network));
        prop_assert_eq!(card.number.is_some(), card.is_valid);
        if let Some(number) = &card.number {
            let verdict = validate(&number.number(), &ValidateOptions::new(), today());
            prop_assert!(verdict.ok, "{:?}: {}", network, verdict.message);
            prop_assert_eq!(verdict.network, Some(network));
        }
    }

    /// Property: generated expiries lie within the configured horizon.
    #[test]
    fn random_expiry_in_range(seed in any::<u64>(), now in today_strategy(), horizon in 0u16..10) {
        let expiry = random_expiry(&mut StdRng::seed_from_u64(seed), now, horizon);
        prop_assert!((1..=12).contains(&expiry.month()));
        prop_assert!(expiry.year() >= now.year());
        prop_assert!(expiry.year() <= now.year() + horizon.saturating_sub(1));
        prop_assert_eq!(parse_expiry(&expiry.to_string()), Ok(expiry));
    }
}

// =============================================================================
// CLASSIFICATION AND VALIDATION PROPERTIES
// =============================================================================

proptest! {
    /// Property: classification is a pure function of the digits.
    #[test]
    fn classify_depends_only_on_digits(
        (raw, formatted) in digit_string_range(0..=19)
            .prop_flat_map(|s| (Just(s.clone()), card_with_separators(s)))
    ) {
        prop_assert_eq!(classify(&raw), classify(&formatted));
        prop_assert_eq!(classify(&raw), classify(&raw));
    }

    /// Property: validation never panics and agrees with `is_valid`.
    #[test]
    fn validate_never_panics(input in "\\PC{0,40}") {
        let verdict = validate(&input, &ValidateOptions::new(), today());
        prop_assert_eq!(verdict.ok, is_valid(&input));
        prop_assert_eq!(verdict.ok, verdict.reason_code.is_none());
    }

    /// Property: the live check never passes with a malformed expiry.
    #[test]
    fn live_check_rejects_bad_expiry(input in digit_string_range(12..=19), expiry in "[0-9/ ]{0,8}") {
        let verdict = validate(&input, &ValidateOptions::live(expiry.clone(), "123"), today());
        if verdict.ok {
            prop_assert!(parse_expiry(&expiry).is_ok());
        }
    }

    /// Property: a passing verdict always names a network with a matching length.
    #[test]
    fn valid_numbers_have_accepted_length(input in digit_string_range(12..=19)) {
        let verdict = validate(&input, &ValidateOptions::new(), today());
        if verdict.ok {
            let classification = classify(&input).unwrap();
            prop_assert_eq!(verdict.network, Some(classification.network));
            prop_assert!(classification.accepts_length(input.len()));
        }
    }

    /// Property: CVVs are accepted exactly at the network's length.
    #[test]
    fn cvv_length_per_network(network in network_strategy(), code in digit_string_range(0..=6)) {
        let expected = cvv::cvv_length_for(network);
        prop_assert_eq!(cvv::is_valid_cvv(&code, network), code.len() == expected);
    }
}

// =============================================================================
// FORMATTING AND MASKING PROPERTIES
// =============================================================================

proptest! {
    /// Property: formatting preserves the digits.
    #[test]
    fn format_preserves_digits(input in digit_string_range(0..=19)) {
        prop_assert_eq!(strip_non_digits(&format::format_for_display(&input)), input);
    }

    /// Property: formatting is idempotent.
    #[test]
    fn format_is_idempotent(input in "[0-9 -]{0,25}") {
        let once = format::format_for_display(&input);
        prop_assert_eq!(format::format_for_display(&once), once);
    }

    /// Property: masks never expose the full number.
    #[test]
    fn mask_hides_number(input in digit_string_range(5..=19)) {
        let masked = mask::mask_string(&input);
        prop_assert!(!strip_non_digits(&masked).contains(&input));
        prop_assert!(masked.ends_with(&input[input.len() - 4..]));

        let card = CardNumber::parse(&input).unwrap();
        let debug_str = format!("{:?}", card);
        let display_str = format!("{}", card);
        prop_assert!(!debug_str.contains(&input));
        prop_assert!(!display_str.contains(&input));
    }

    /// Property: the BIN mask keeps exactly the first six and last four digits.
    #[test]
    fn mask_with_bin_keeps_bin_and_last_four(input in digit_string_range(11..=19)) {
        let digits: Vec<u8> = input.bytes().map(|b| b - b'0').collect();
        let masked = mask::mask_with_bin(&digits);
        prop_assert_eq!(masked.len(), input.len());
        prop_assert_eq!(&masked[..6], &input[..6]);
        prop_assert_eq!(&masked[masked.len() - 4..], &input[input.len() - 4..]);
        prop_assert_eq!(masked.matches('*').count(), input.len() - 10);
    }
}

// =============================================================================
// BULK PARSER PROPERTIES
// =============================================================================

proptest! {
    /// Property: every non-blank line is either parsed or dropped.
    #[test]
    fn bulk_accounts_for_every_line(text in "[0-9a-z|/ \\n]{0,200}") {
        let report = parse_bulk(&text, today());
        let non_blank = text.lines().filter(|l| !l.trim().is_empty()).count();
        prop_assert_eq!(report.lines_read, non_blank);
        prop_assert_eq!(report.results.len() + report.dropped, non_blank);

        let summary = report.summary();
        prop_assert_eq!(summary.valid + summary.invalid, summary.total);
        for result in &report.results {
            prop_assert!(!result.entry.number.is_empty());
            prop_assert!(result.entry.number.bytes().all(|b| b.is_ascii_digit()));
            prop_assert!(result.entry.cvv.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    /// Property: a pipe triple always round-trips its number.
    #[test]
    fn bulk_pipe_triple_keeps_number(number in digit_string_range(1..=19), cvv in digit_string_range(3..=4)) {
        let line = format!("{} | 12/27 | {}", format::format_for_display(&number), cvv);
        let report = parse_bulk(&line, today());
        prop_assert_eq!(report.results.len(), 1);
        prop_assert_eq!(&report.results[0].entry.number, &number);
        prop_assert_eq!(&report.results[0].entry.cvv, &cvv);
    }
}
