//! Node.js bindings for cc_checker.
//!
//! This crate provides native Node.js bindings using napi-rs.
//!
//! # Usage
//!
//! ```javascript
//! const { checkCard, isValid, generateTestCard, parseBulk } = require('cc-checker');
//!
//! const result = checkCard("4532-0151-1283-0366", "12/27", "123", true);
//! if (!result.ok) {
//!     console.log(`${result.reasonCode}: ${result.message}`);
//! }
//!
//! const card = generateTestCard("amex");
//! console.log(card.pipeLine);
//! ```

use napi::bindgen_prelude::*;
use napi_derive::napi;

use cc_checker::bulk::BulkResult;
use cc_checker::generate::{generate_many, ExportFormat, GenerateTarget, GeneratedCard};
use cc_checker::{
    classify, classify_bin, format, is_valid as cc_is_valid, luhn_check_digit as cc_check_digit,
    luhn_valid as cc_luhn_valid, mask_string, parse_bulk as cc_parse_bulk, validate, CardNumber,
    CheckerConfig, ValidateOptions, YearMonth,
};

/// Validation verdict.
#[napi(object)]
pub struct CheckResult {
    pub ok: bool,
    pub reason_code: Option<String>,
    pub message: String,
    pub network: Option<String>,
    pub masked: Option<String>,
    pub score: Option<u32>,
}

/// Validates a card number, optionally with a simulated live check.
///
/// @param cardNumber - The card number to validate
/// @param expiry - Expiry as MM/YY (live check only)
/// @param cvv - CVV (live check only)
/// @param liveCheck - Run the simulated live check
#[napi]
pub fn check_card(
    card_number: String,
    expiry: Option<String>,
    cvv: Option<String>,
    live_check: Option<bool>,
) -> CheckResult {
    let options = ValidateOptions {
        expiry,
        cvv,
        live_check: live_check.unwrap_or(false),
    };
    let verdict = validate(&card_number, &options, YearMonth::current());
    CheckResult {
        ok: verdict.ok,
        reason_code: verdict.reason_code.map(|c| c.as_str().to_string()),
        message: verdict.message,
        network: verdict.network.map(|n| n.display_name().to_string()),
        masked: CardNumber::parse(&card_number).map(|n| n.masked()),
        score: verdict.score,
    }
}

/// Quick check if a card number is valid.
#[napi]
pub fn is_valid(card_number: String) -> bool {
    cc_is_valid(&card_number)
}

/// Checks if a card passes the Luhn algorithm.
#[napi]
pub fn luhn_valid(card_number: String) -> bool {
    cc_luhn_valid(&card_number)
}

/// Computes the check digit that completes a partial number.
#[napi]
pub fn luhn_check_digit(partial: String) -> u32 {
    cc_check_digit(&partial) as u32
}

/// Network classification of a (partial) card number.
#[napi(object)]
pub struct NetworkInfo {
    pub id: String,
    pub name: String,
    pub label: String,
    pub valid_lengths: Vec<u32>,
    pub uses_checksum: bool,
}

/// Detects the network of a (partial) card number.
///
/// @returns Network details or null
#[napi]
pub fn detect_network(card_number: String) -> Option<NetworkInfo> {
    classify(&card_number).map(|c| NetworkInfo {
        id: c.network.id().to_string(),
        name: c.network.display_name().to_string(),
        label: c.label.to_string(),
        valid_lengths: c.valid_lengths.iter().map(|&l| l as u32).collect(),
        uses_checksum: c.uses_checksum,
    })
}

/// Six-digit BIN check.
#[napi(object)]
pub struct BinResult {
    pub valid: bool,
    pub bin: String,
    pub network: Option<String>,
    pub label: Option<String>,
}

/// Checks the first six digits of a card number.
///
/// @returns BinResult, or null for fewer than six digits
#[napi]
pub fn check_bin(card_number: String) -> Option<BinResult> {
    classify_bin(&card_number).map(|check| BinResult {
        valid: check.valid,
        bin: check.bin,
        network: check.network.map(|n| n.display_name().to_string()),
        label: check.label.map(str::to_string),
    })
}

/// Formats a card number for display.
#[napi]
pub fn format_card(card_number: String) -> String {
    format::format_for_display(&card_number)
}

/// Formats a card number with a custom separator.
#[napi]
pub fn format_card_with_separator(card_number: String, separator: String) -> String {
    format::format_with_separator(&card_number, &separator)
}

/// Masks a card number, keeping the last four digits.
#[napi]
pub fn mask_card(card_number: String) -> String {
    mask_string(&card_number)
}

/// A generated test card.
#[napi(object)]
pub struct TestCard {
    pub number: Option<String>,
    pub network: String,
    pub cvv: String,
    pub expiry: String,
    pub bank: String,
    pub country: String,
    pub is_valid: bool,
    pub pipe_line: Option<String>,
    pub spaced_line: Option<String>,
}

impl From<GeneratedCard> for TestCard {
    fn from(card: GeneratedCard) -> Self {
        Self {
            number: card.number.as_ref().map(|n| n.number()),
            network: card.network.id().to_string(),
            cvv: card.cvv.clone(),
            expiry: card.expiry.to_string(),
            is_valid: card.is_valid,
            pipe_line: card.export_line(ExportFormat::Pipe),
            spaced_line: card.export_line(ExportFormat::Spaced),
            bank: card.bank,
            country: card.country_code,
        }
    }
}

fn parse_target(network: &str) -> Result<GenerateTarget> {
    network
        .parse()
        .map_err(|e: cc_checker::card::UnknownNetwork| Error::new(Status::InvalidArg, e.to_string()))
}

/// Generates a test card.
///
/// @param network - Network id (visa, mastercard, amex, discover, diners, jcb, maestro, unionpay) or "random"
#[napi]
pub fn generate_test_card(network: String) -> Result<TestCard> {
    let target = parse_target(&network)?;
    let card = cc_checker::generate(
        target,
        &mut rand::thread_rng(),
        YearMonth::current(),
        &CheckerConfig::default(),
    );
    Ok(card.into())
}

/// Generates several test cards; "all" spreads them over the primary networks.
#[napi]
pub fn generate_test_cards(network: String, count: u32) -> Result<Vec<TestCard>> {
    let target = parse_target(&network)?;
    let cards = generate_many(
        target,
        count as usize,
        &mut rand::thread_rng(),
        YearMonth::current(),
        &CheckerConfig::default(),
    );
    Ok(cards.into_iter().map(TestCard::from).collect())
}

/// One parsed line of bulk input.
#[napi(object)]
pub struct BulkRow {
    pub line: u32,
    pub format: String,
    pub number: String,
    pub expiry: String,
    pub cvv: String,
    pub network: Option<String>,
    pub bank: String,
    pub country: String,
    pub ok: bool,
    pub reason_code: Option<String>,
}

impl From<&BulkResult> for BulkRow {
    fn from(result: &BulkResult) -> Self {
        Self {
            line: result.line as u32,
            format: result.entry.format.to_string(),
            number: result.entry.number.clone(),
            expiry: result.entry.expiry.clone(),
            cvv: result.entry.cvv.clone(),
            network: result.network.map(|n| n.display_name().to_string()),
            bank: result.issuer.bank.to_string(),
            country: result.issuer.country.to_string(),
            ok: result.verdict.ok,
            reason_code: result.verdict.reason_code.map(|c| c.as_str().to_string()),
        }
    }
}

/// Parses bulk text. Lines without a card number are left out.
#[napi]
pub fn parse_bulk(text: String) -> Vec<BulkRow> {
    cc_parse_bulk(&text, YearMonth::current())
        .results
        .iter()
        .map(BulkRow::from)
        .collect()
}

/// Batch check of several card numbers.
#[napi]
pub fn check_batch(card_numbers: Vec<String>) -> Vec<CheckResult> {
    card_numbers
        .into_iter()
        .map(|card| check_card(card, None, None, None))
        .collect()
}
