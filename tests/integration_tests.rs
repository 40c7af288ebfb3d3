//! Integration tests for cc_checker.
//!
//! These tests cover real-world test numbers, the catalog's overlap rules,
//! live checks, generation, bulk parsing and the session history.

use cc_checker::{
    batch::BatchValidator,
    bin::{BinInfo, BinLookup, FallbackLookup, LookupError, MemoryBinDbBuilder, StaticBinTable},
    bulk::{parse_bulk, Filter, LineFormat, REPORT_HEADER},
    check_number, classify, classify_bin,
    generate::{export_lines, generate_for, generate_many, ExportFormat, GenerateTarget},
    is_valid, luhn, mask_string,
    session::Session,
    stream::ValidateExt,
    validate, validate_with_config, CheckerConfig, Network, ReasonCode, Rejection,
    ValidateOptions, YearMonth,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

// =============================================================================
// REAL-WORLD TEST CARD NUMBERS
// =============================================================================
// Published processor test numbers. They pass Luhn but are not real cards.

mod test_cards {
    pub const VISA_1: &str = "4111111111111111";
    pub const VISA_2: &str = "4012888888881881";
    pub const VISA_13: &str = "4222222222222";
    pub const VISA_19: &str = "4111111111111111110";
    pub const VISA_3: &str = "4242424242424242";

    pub const MC_1: &str = "5555555555554444";
    pub const MC_2: &str = "5105105105105100";
    pub const MC_3: &str = "5200828282828210";
    pub const MC_2SERIES_1: &str = "2223000048400011";
    pub const MC_2SERIES_2: &str = "2223520043560014";

    pub const AMEX_1: &str = "378282246310005";
    pub const AMEX_2: &str = "371449635398431";
    pub const AMEX_3: &str = "340000000000009";

    pub const DISCOVER_1: &str = "6011111111111117";
    pub const DISCOVER_2: &str = "6011000990139424";
    pub const DISCOVER_644: &str = "6445644564456445";
    pub const DISCOVER_622: &str = "6221260000000000";

    pub const DINERS_1: &str = "30569309025904";
    pub const DINERS_2: &str = "36700102000000";

    pub const JCB_1: &str = "3530111333300000";
    pub const JCB_2: &str = "3566002020360505";

    pub const MAESTRO: &str = "6759649826438453";
    pub const UNIONPAY: &str = "6212345678901265";
    pub const UNIONPAY_NO_LUHN: &str = "6200000000000000";
}

fn today() -> YearMonth {
    YearMonth::new(2025, 6).unwrap()
}

fn network_of(card: &str) -> Network {
    check_number(card)
        .unwrap_or_else(|e| panic!("{} should be valid: {}", card, e))
        .network()
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

#[test]
fn test_all_test_cards_by_network() {
    let cases: &[(&[&str], Network)] = &[
        (
            &[
                test_cards::VISA_1,
                test_cards::VISA_2,
                test_cards::VISA_13,
                test_cards::VISA_19,
                test_cards::VISA_3,
            ],
            Network::Visa,
        ),
        (
            &[
                test_cards::MC_1,
                test_cards::MC_2,
                test_cards::MC_3,
                test_cards::MC_2SERIES_1,
                test_cards::MC_2SERIES_2,
            ],
            Network::Mastercard,
        ),
        (
            &[test_cards::AMEX_1, test_cards::AMEX_2, test_cards::AMEX_3],
            Network::Amex,
        ),
        (
            &[
                test_cards::DISCOVER_1,
                test_cards::DISCOVER_2,
                test_cards::DISCOVER_644,
                test_cards::DISCOVER_622,
            ],
            Network::Discover,
        ),
        (&[test_cards::DINERS_1, test_cards::DINERS_2], Network::Diners),
        (&[test_cards::JCB_1, test_cards::JCB_2], Network::Jcb),
        (&[test_cards::MAESTRO], Network::Maestro),
        (&[test_cards::UNIONPAY], Network::UnionPay),
    ];

    for (cards, network) in cases {
        for card in *cards {
            assert_eq!(network_of(card), *network, "{}", card);
        }
    }
}

#[test]
fn test_overlapping_prefixes_resolve_by_catalog_order() {
    assert_eq!(classify("6011").unwrap().network, Network::Discover);
    assert_eq!(classify("65").unwrap().network, Network::Discover);
    assert_eq!(classify("622126").unwrap().network, Network::Discover);
    assert_eq!(classify("622925").unwrap().network, Network::Discover);
    // Outside Discover's 622126-622925 window.
    assert_eq!(classify("622000").unwrap().network, Network::UnionPay);
    assert_eq!(classify("6200").unwrap().network, Network::UnionPay);
    // Maestro's catch-all 6 only applies after everything else.
    assert_eq!(classify("6799").unwrap().network, Network::Maestro);
    assert_eq!(classify("50").unwrap().network, Network::Maestro);
}

#[test]
fn test_classify_partial_and_unknown() {
    assert!(classify("").is_none());
    assert!(classify("4").is_none());
    assert_eq!(classify("41").unwrap().network, Network::Visa);
    assert!(classify("99").is_none());
    assert!(classify("1234567890").is_none());
}

#[test]
fn test_classify_is_pure() {
    for input in ["6011000000000004", "378282246310005", "62", "x"] {
        assert_eq!(classify(input), classify(input));
    }
}

#[test]
fn test_bin_check() {
    let check = classify_bin("4532 0151 1283 0366").unwrap();
    assert!(check.valid);
    assert_eq!(check.bin, "453201");
    assert_eq!(check.network, Some(Network::Visa));

    assert!(!classify_bin("999999").unwrap().valid);
    assert!(classify_bin("45320").is_none());
}

// =============================================================================
// VALIDATION GATES
// =============================================================================

#[test]
fn test_various_separators() {
    for input in [
        "4111111111111111",
        "4111 1111 1111 1111",
        "4111-1111-1111-1111",
        "4111.1111.1111.1111",
        " 4111 1111-1111 1111 ",
    ] {
        assert!(is_valid(input), "{:?} should be valid", input);
    }
}

#[test]
fn test_empty_input() {
    for input in ["", "   ", "abc", "----"] {
        let verdict = validate(input, &ValidateOptions::new(), today());
        assert_eq!(verdict.reason_code, Some(ReasonCode::Empty), "{:?}", input);
        assert_eq!(verdict.network, None);
    }
}

#[test]
fn test_unrecognized_network() {
    let verdict = validate("9999999999999995", &ValidateOptions::new(), today());
    assert_eq!(verdict.reason_code, Some(ReasonCode::UnrecognizedNetwork));
}

#[test]
fn test_length_gate_wins_over_checksum() {
    // 15-digit Visa that also fails Luhn.
    let verdict = validate("491659228999391", &ValidateOptions::new(), today());
    assert_eq!(verdict.reason_code, Some(ReasonCode::BadLength));
    assert_eq!(verdict.network, Some(Network::Visa));

    match check_number("491659228999391") {
        Err(Rejection::BadLength { length, .. }) => assert_eq!(length, 15),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_checksum_gate() {
    for card in [test_cards::VISA_1, test_cards::AMEX_1, test_cards::DINERS_1] {
        let mut broken = card.to_string();
        let last = broken.pop().unwrap().to_digit(10).unwrap();
        broken.push(char::from_digit((last + 1) % 10, 10).unwrap());

        let verdict = validate(&broken, &ValidateOptions::new(), today());
        assert_eq!(verdict.reason_code, Some(ReasonCode::ChecksumFail), "{}", broken);
    }
}

#[test]
fn test_unionpay_checksum_exemption() {
    assert!(!luhn::luhn_valid(test_cards::UNIONPAY_NO_LUHN));
    let verdict = validate(test_cards::UNIONPAY_NO_LUHN, &ValidateOptions::new(), today());
    assert!(verdict.ok);
    assert_eq!(verdict.network, Some(Network::UnionPay));
}

#[test]
fn test_error_messages_are_helpful() {
    let verdict = validate("491659228999391", &ValidateOptions::new(), today());
    assert!(verdict.message.contains("Visa"));
    assert!(verdict.message.contains("15"));

    let verdict = validate("4111111111111112", &ValidateOptions::new(), today());
    assert!(verdict.message.to_lowercase().contains("luhn"));
}

// =============================================================================
// LIVE CHECK
// =============================================================================

#[test]
fn test_live_check_full_score() {
    let verdict = validate(test_cards::AMEX_1, &ValidateOptions::live("12/27", "1234"), today());
    assert!(verdict.ok);
    assert_eq!(verdict.score, Some(120));
}

#[test]
fn test_live_check_unrealistic_expiry_still_passes() {
    let verdict = validate(test_cards::VISA_1, &ValidateOptions::live("12/99", "123"), today());
    assert!(verdict.ok);
    assert_eq!(verdict.score, Some(115));
}

#[test]
fn test_live_check_expiry_failures() {
    let cases = ["", "13/27", "1/27", "12/2027", "05/25"];
    for expiry in cases {
        let verdict = validate(test_cards::VISA_1, &ValidateOptions::live(expiry, "123"), today());
        assert_eq!(verdict.reason_code, Some(ReasonCode::BadExpiry), "{:?}", expiry);
    }
    // The current month is still valid.
    assert!(validate(test_cards::VISA_1, &ValidateOptions::live("06/25", "123"), today()).ok);
}

#[test]
fn test_live_check_cvv_length_per_network() {
    let amex = validate(test_cards::AMEX_1, &ValidateOptions::live("12/27", "123"), today());
    assert_eq!(amex.reason_code, Some(ReasonCode::BadCvv));

    let visa = validate(test_cards::VISA_1, &ValidateOptions::live("12/27", "1234"), today());
    assert_eq!(visa.reason_code, Some(ReasonCode::BadCvv));

    let missing = validate(test_cards::VISA_1, &ValidateOptions::live("12/27", ""), today());
    assert_eq!(missing.reason_code, Some(ReasonCode::BadCvv));

    // Separators in the CVV are ignored.
    assert!(validate(test_cards::VISA_1, &ValidateOptions::live("12/27", "1 2 3"), today()).ok);
}

#[test]
fn test_live_check_number_gates_come_first() {
    let verdict = validate("4111111111111112", &ValidateOptions::live("13/99", "1"), today());
    assert_eq!(verdict.reason_code, Some(ReasonCode::ChecksumFail));
}

#[test]
fn test_live_check_threshold() {
    let strict = CheckerConfig {
        live_check_threshold: 100,
        ..CheckerConfig::default()
    };
    // UnionPay without a Luhn digit scores 80.
    let options = ValidateOptions::live("12/27", "123");
    let verdict = validate_with_config(test_cards::UNIONPAY_NO_LUHN, &options, today(), &strict);
    assert_eq!(verdict.reason_code, Some(ReasonCode::LiveCheckFail));
    assert_eq!(verdict.score, Some(80));

    let verdict = validate(test_cards::UNIONPAY_NO_LUHN, &options, today());
    assert!(verdict.ok);
    assert_eq!(verdict.score, Some(80));
}

#[test]
fn test_expiry_and_cvv_ignored_without_live_check() {
    let options = ValidateOptions::new().expiry("01/20").cvv("1");
    assert!(validate(test_cards::VISA_1, &options, today()).ok);
}

// =============================================================================
// GENERATION
// =============================================================================

#[test]
fn test_generated_cards_validate() {
    let config = CheckerConfig::default();
    let mut rng = StdRng::seed_from_u64(2024);

    for network in Network::PRIMARY {
        for _ in 0..20 {
            let card = generate_for(network, &mut rng, today(), &config);
            assert_eq!(card.network, network);
            let Some(number) = &card.number else {
                continue;
            };
            let verdict = validate(&number.number(), &ValidateOptions::new(), today());
            assert!(verdict.ok, "{} generated {:?}", network, verdict);
            assert_eq!(verdict.network, Some(network));
            assert!(card.is_valid);
            assert_eq!(card.cvv.len(), if network == Network::Amex { 4 } else { 3 });
            assert!((2025..2030).contains(&card.expiry.year()));
        }
    }
}

#[test]
fn test_generated_cards_pass_live_check() {
    let config = CheckerConfig::default();
    let mut rng = StdRng::seed_from_u64(11);
    let cards = generate_many(GenerateTarget::All, 30, &mut rng, today(), &config);
    // Expiries start in the current year, so check as of January.
    let january = YearMonth::new(2025, 1).unwrap();

    for card in cards.iter().filter(|c| c.number.is_some()) {
        let number = card.number.as_ref().unwrap().number();
        let options = ValidateOptions::live(card.expiry.to_string(), card.cvv.clone());
        assert!(validate(&number, &options, january).ok, "{}", card.formatted());
    }
}

#[test]
fn test_generate_all_share() {
    let mut rng = StdRng::seed_from_u64(3);
    let cards = generate_many(GenerateTarget::All, 12, &mut rng, today(), &CheckerConfig::default());
    for network in Network::PRIMARY {
        assert_eq!(cards.iter().filter(|c| c.network == network).count(), 2);
    }
}

#[test]
fn test_generated_metadata() {
    let mut rng = StdRng::seed_from_u64(5);
    let config = CheckerConfig::default();
    for _ in 0..20 {
        let card = generate_for(Network::Jcb, &mut rng, today(), &config);
        assert_eq!(card.bank, "JCB");
        assert_eq!(card.country_code, "JP");
    }
}

#[test]
fn test_generate_target_parsing() {
    assert_eq!("visa".parse::<GenerateTarget>().unwrap(), GenerateTarget::Network(Network::Visa));
    assert_eq!("ALL".parse::<GenerateTarget>().unwrap(), GenerateTarget::All);
    assert_eq!("random".parse::<GenerateTarget>().unwrap(), GenerateTarget::Random);
    assert!("mir".parse::<GenerateTarget>().is_err());
}

#[test]
fn test_exported_cards_parse_back() {
    let config = CheckerConfig::default();
    let mut rng = StdRng::seed_from_u64(77);
    let cards = generate_many(GenerateTarget::All, 24, &mut rng, today(), &config);
    let generated: Vec<String> = cards
        .iter()
        .filter_map(|c| c.number.as_ref().map(|n| n.number()))
        .collect();

    for format in [ExportFormat::Pipe, ExportFormat::Spaced] {
        let report = parse_bulk(&export_lines(&cards, format), today());
        let parsed: Vec<String> = report.results.iter().map(|r| r.entry.number.clone()).collect();
        assert_eq!(parsed, generated, "{:?}", format);
        assert_eq!(report.summary().invalid, 0);
        assert_eq!(report.dropped, 0);
        for (result, card) in report.results.iter().zip(cards.iter().filter(|c| c.number.is_some())) {
            assert_eq!(result.entry.expiry, card.expiry.to_string());
            assert_eq!(result.entry.cvv, card.cvv);
        }
    }
}

// =============================================================================
// BULK PARSING
// =============================================================================

#[test]
fn test_bulk_literal_scenarios() {
    let text = "\
5255 9391 0489 8994 | 05/26 | 244
5555555555554444 05/26 | 244
4546 5691 4776 4006 10 29 564


nothing to see";
    let report = parse_bulk(text, today());

    assert_eq!(report.lines_read, 4);
    assert_eq!(report.results.len(), 3);
    assert_eq!(report.dropped, 1);

    let first = &report.results[0];
    assert_eq!(first.line, 1);
    assert_eq!(first.entry.format, LineFormat::PipeTriple);
    assert_eq!(first.entry.number, "5255939104898994");
    assert_eq!(first.entry.expiry, "05/26");
    assert_eq!(first.entry.cvv, "244");
    assert!(first.is_valid());
    assert_eq!(first.issuer.bank, "Bank of America");

    let second = &report.results[1];
    assert_eq!(second.entry.format, LineFormat::PipePair);
    assert_eq!(second.entry.number, "5555555555554444");
    assert!(second.is_valid());

    let third = &report.results[2];
    assert_eq!(third.line, 3);
    assert_eq!(third.entry.format, LineFormat::SpacedMonthYear);
    assert_eq!(third.entry.number, "4546569147764006");
    assert_eq!(third.entry.expiry, "10/29");
    assert_eq!(third.entry.cvv, "564");
    assert_eq!(third.verdict.reason_code, Some(ReasonCode::ChecksumFail));
    assert_eq!(third.issuer.bank, "İş Bankası");
}

#[test]
fn test_bulk_filter_and_export() {
    let text = "4111111111111111 | 12/27 | 123\n4111111111111112 | 12/27 | 123";
    let report = parse_bulk(text, today());
    let summary = report.summary();
    assert_eq!((summary.total, summary.valid, summary.invalid), (2, 1, 1));

    assert_eq!(report.filter(Filter::Valid).count(), 1);
    assert_eq!(report.filter(Filter::Invalid).next().unwrap().line, 2);

    let text = report.to_text(Filter::Valid);
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(REPORT_HEADER));
    let row = lines.next().unwrap();
    assert!(row.starts_with("4111 1111 1111 1111 | Visa | 123 | 12/27"));
    assert!(row.ends_with("Valid"));
    assert!(lines.next().is_none());
}

#[test]
fn test_bulk_empty_input() {
    let report = parse_bulk("", today());
    assert!(report.results.is_empty());
    assert_eq!(report.lines_read, 0);
    assert_eq!(report.to_text(Filter::All), REPORT_HEADER);
}

// =============================================================================
// SESSION AND HISTORY
// =============================================================================

fn quiet_session(capacity: usize) -> Session {
    Session::new(CheckerConfig {
        history_capacity: capacity,
        ..CheckerConfig::default().without_delay()
    })
}

#[test]
fn test_history_is_bounded_and_most_recent_first() {
    let mut session = quiet_session(2);
    for card in [test_cards::VISA_1, test_cards::MC_1, test_cards::AMEX_1] {
        assert!(session.check(card, &ValidateOptions::new(), today()).ok);
    }

    let history: Vec<_> = session.history().iter().map(|r| r.last_four()).collect();
    assert_eq!(history, vec!["0005", "4444"]);
    assert_eq!(session.history().capacity(), 2);
}

#[test]
fn test_history_records_live_attempts_only_past_number_checks() {
    let mut session = quiet_session(10);

    // Rejected number, no live phase: not recorded.
    session.check("4111111111111112", &ValidateOptions::new(), today());
    session.check("4111111111111112", &ValidateOptions::live("12/27", "123"), today());
    assert!(session.history().is_empty());

    // Live phase reached, then failed on the CVV: recorded.
    let verdict = session.check(test_cards::AMEX_1, &ValidateOptions::live("12/27", "12"), today());
    assert!(!verdict.ok);
    assert_eq!(session.history().len(), 1);
    assert!(!session.history().latest().unwrap().ok());

    session.clear_history();
    assert!(session.history().is_empty());
}

#[test]
fn test_history_never_stores_full_numbers_in_display() {
    let mut session = quiet_session(10);
    session.check(test_cards::VISA_1, &ValidateOptions::new(), today());
    let record = session.history().latest().unwrap();
    assert_eq!(record.masked(), "****-****-****-1111");
    assert!(!format!("{:?}", record).contains(test_cards::VISA_1));
}

// =============================================================================
// BIN LOOKUP
// =============================================================================

#[test]
fn test_static_lookup() {
    let info = StaticBinTable::new().lookup("453201").unwrap();
    assert_eq!(info.issuer.as_deref(), Some("HSBC Bank"));
    assert_eq!(info.country.as_deref(), Some("TR"));

    assert!(matches!(StaticBinTable::new().lookup("4532"), Err(LookupError::InvalidBin(_))));
    assert_eq!(
        StaticBinTable::new().lookup("999999").unwrap_err().code(),
        ReasonCode::LookupFailed
    );
}

#[test]
fn test_session_lookup_prefers_service_then_falls_back() {
    let db = MemoryBinDbBuilder::new()
        .add("411111", BinInfo::with_bin("411111").issuer("Test Bank").country("US"))
        .build();
    let session = Session::default().with_lookup(db);

    assert_eq!(session.lookup_bin("4111 1111").unwrap().issuer.as_deref(), Some("Test Bank"));
    assert_eq!(session.lookup_bin("453201").unwrap().issuer.as_deref(), Some("HSBC Bank"));
    assert!(session.lookup_bin("12").is_err());
}

#[test]
fn test_fallback_wraps_any_service() {
    let lookup = FallbackLookup::new(MemoryBinDbBuilder::new().build());
    assert_eq!(lookup.lookup("540100").unwrap().issuer.as_deref(), Some("İş Bankası"));
}

// =============================================================================
// BATCH, STREAM, MASKING
// =============================================================================

#[test]
fn test_batch_preserves_order() {
    let cards = [test_cards::VISA_1, "bad", test_cards::AMEX_1, "4111111111111112"];
    let results = BatchValidator::new().check_all(&cards);
    assert!(results[0].is_ok());
    assert_eq!(results[1].as_ref().unwrap_err(), &Rejection::Empty);
    assert_eq!(results[2].as_ref().unwrap().network(), Network::Amex);
    assert_eq!(results[3].as_ref().unwrap_err(), &Rejection::ChecksumFail);
}

#[test]
fn test_stream_valid_only() {
    let cards = vec![test_cards::VISA_1, "invalid", test_cards::JCB_1];
    let networks: Vec<_> = cards.into_iter().valid_only().map(|c| c.network()).collect();
    assert_eq!(networks, vec![Network::Visa, Network::Jcb]);
}

#[test]
fn test_masking_never_exposes_full_number() {
    for card in [test_cards::VISA_1, test_cards::AMEX_1, test_cards::DINERS_1] {
        let valid = check_number(card).unwrap();
        assert!(!valid.number().masked().contains(card));
        assert!(!format!("{}", valid.number()).contains(card));
        assert!(!format!("{:?}", valid).contains(card));
        assert!(!mask_string(card).contains(card));
        assert!(mask_string(card).ends_with(&card[card.len() - 4..]));
    }
}

#[test]
fn test_no_panic_on_any_input() {
    let inputs = [
        "",
        "🎉🎉🎉",
        "٤١١١١١١١١١١١١١١١",
        "4111111111111111111111111111111",
        "\0\0\0",
        "| | |",
        "12/34 | 12/34 | 12/34",
    ];
    for input in inputs {
        let _ = validate(input, &ValidateOptions::live(input, input), today());
        let _ = classify(input);
        let _ = classify_bin(input);
        let _ = parse_bulk(input, today());
        let _ = cc_checker::format_for_display(input);
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

#[cfg(feature = "config")]
#[test]
fn test_config_from_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "history_capacity": 3, "live_check_delay_ms": 0, "default_country": "us" }}"#)
        .unwrap();

    let config = CheckerConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.history_capacity, 3);
    assert_eq!(config.live_check_delay_ms, 0);
    assert_eq!(config.default_country, "US");
    assert_eq!(config.live_check_threshold, 70);

    let mut bad = tempfile::NamedTempFile::new().unwrap();
    write!(bad, r#"{{ "history_capacity": 0 }}"#).unwrap();
    assert!(CheckerConfig::from_json_file(bad.path()).is_err());

    assert!(CheckerConfig::from_json_file("/nonexistent/checker.json").is_err());
}
