//! WebAssembly bindings.
//!
//! # Usage from JavaScript
//!
//! ```javascript
//! import init, { check_card, is_valid, generate_test_card, parse_bulk } from 'cc_checker';
//!
//! await init();
//!
//! const result = check_card("4532-0151-1283-0366", "12/27", "123", true);
//! if (result.ok) {
//!     console.log(`Network: ${result.network}, score ${result.score}`);
//! } else {
//!     console.log(`${result.reason_code}: ${result.message}`);
//! }
//!
//! const card = generate_test_card("visa");
//! console.log(card.pipe_line);
//! ```

#![cfg(feature = "wasm")]

use crate::bulk::BulkResult;
use crate::generate::{ExportFormat, GenerateTarget, GeneratedCard};
use crate::{CheckerConfig, Network, ValidateOptions, YearMonth};
use wasm_bindgen::prelude::*;

/// The current month from the JavaScript clock.
fn today() -> YearMonth {
    let now = js_sys::Date::new_0();
    let year = u16::try_from(now.get_full_year()).unwrap_or(u16::MAX);
    let month = (now.get_month() + 1) as u8;
    YearMonth::new(year, month).unwrap_or_else(YearMonth::current)
}

/// Validation verdict, returned to JavaScript.
#[wasm_bindgen]
pub struct CheckResult {
    ok: bool,
    reason_code: Option<String>,
    message: String,
    network: Option<String>,
    masked: Option<String>,
    score: Option<u32>,
}

#[wasm_bindgen]
impl CheckResult {
    #[wasm_bindgen(getter)]
    pub fn ok(&self) -> bool {
        self.ok
    }

    #[wasm_bindgen(getter)]
    pub fn reason_code(&self) -> Option<String> {
        self.reason_code.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn network(&self) -> Option<String> {
        self.network.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn masked(&self) -> Option<String> {
        self.masked.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> Option<u32> {
        self.score
    }
}

/// Validates a card number, optionally with a live check.
///
/// The simulated live-check delay is left to the caller.
#[wasm_bindgen]
pub fn check_card(
    card_number: &str,
    expiry: Option<String>,
    cvv: Option<String>,
    live_check: bool,
) -> CheckResult {
    let options = ValidateOptions {
        expiry,
        cvv,
        live_check,
    };
    let verdict = crate::validate(card_number, &options, today());
    CheckResult {
        ok: verdict.ok,
        reason_code: verdict.reason_code.map(|c| c.as_str().to_string()),
        message: verdict.message,
        network: verdict.network.map(|n| n.display_name().to_string()),
        masked: crate::CardNumber::parse(card_number).map(|n| n.masked()),
        score: verdict.score,
    }
}

/// Quick number check without a live check.
#[wasm_bindgen]
pub fn is_valid(card_number: &str) -> bool {
    crate::is_valid(card_number)
}

/// Luhn check on the digits of the input.
#[wasm_bindgen]
pub fn luhn_valid(card_number: &str) -> bool {
    crate::luhn_valid(card_number)
}

/// Check digit completing `partial`.
#[wasm_bindgen]
pub fn luhn_check_digit(partial: &str) -> u8 {
    crate::luhn_check_digit(partial)
}

/// Network name for a (partial) card number.
///
/// ```javascript
/// detect_network("6011");  // "Discover"
/// ```
#[wasm_bindgen]
pub fn detect_network(card_number: &str) -> Option<String> {
    crate::classify(card_number).map(|c| c.network.display_name().to_string())
}

/// Label of the rule matching the first six digits, when they are known.
#[wasm_bindgen]
pub fn bin_label(card_number: &str) -> Option<String> {
    crate::classify_bin(card_number)
        .and_then(|check| check.label)
        .map(str::to_string)
}

/// Formats a card number for display.
#[wasm_bindgen]
pub fn format_card(card_number: &str) -> String {
    crate::format::format_for_display(card_number)
}

/// Formats a card number with a custom separator.
#[wasm_bindgen]
pub fn format_card_with_separator(card_number: &str, separator: &str) -> String {
    crate::format::format_with_separator(card_number, separator)
}

/// Masks a card number, showing only the last 4 digits.
#[wasm_bindgen]
pub fn mask_card(card_number: &str) -> String {
    crate::mask::mask_string(card_number)
}

/// A generated test card.
#[wasm_bindgen]
pub struct TestCard {
    number: Option<String>,
    network: String,
    cvv: String,
    expiry: String,
    bank: String,
    country: String,
    pipe_line: Option<String>,
}

#[wasm_bindgen]
impl TestCard {
    #[wasm_bindgen(getter)]
    pub fn number(&self) -> Option<String> {
        self.number.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn network(&self) -> String {
        self.network.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn cvv(&self) -> String {
        self.cvv.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn expiry(&self) -> String {
        self.expiry.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn bank(&self) -> String {
        self.bank.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn country(&self) -> String {
        self.country.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn pipe_line(&self) -> Option<String> {
        self.pipe_line.clone()
    }
}

impl From<GeneratedCard> for TestCard {
    fn from(card: GeneratedCard) -> Self {
        Self {
            number: card.number.as_ref().map(|n| n.number()),
            network: card.network.display_name().to_string(),
            cvv: card.cvv.clone(),
            expiry: card.expiry.to_string(),
            pipe_line: card.export_line(ExportFormat::Pipe),
            bank: card.bank,
            country: card.country_code,
        }
    }
}

/// Generates a test card for a network id, or `"random"`.
#[wasm_bindgen]
pub fn generate_test_card(network: &str) -> Result<TestCard, JsValue> {
    let target: GenerateTarget = network
        .parse()
        .map_err(|e: crate::card::UnknownNetwork| JsValue::from_str(&e.to_string()))?;
    let card = crate::generate(target, &mut rand::thread_rng(), today(), &CheckerConfig::default());
    Ok(card.into())
}

/// Generates `count` cards; `"all"` spreads them over the primary networks.
#[wasm_bindgen]
pub fn generate_test_cards(network: &str, count: usize) -> Result<js_sys::Array, JsValue> {
    let target: GenerateTarget = network
        .parse()
        .map_err(|e: crate::card::UnknownNetwork| JsValue::from_str(&e.to_string()))?;
    let cards = crate::generate::generate_many(
        target,
        count,
        &mut rand::thread_rng(),
        today(),
        &CheckerConfig::default(),
    );
    let out = js_sys::Array::new();
    for card in cards {
        out.push(&JsValue::from(TestCard::from(card)));
    }
    Ok(out)
}

/// One row of a bulk report.
#[wasm_bindgen]
pub struct BulkRow {
    line: usize,
    number: String,
    expiry: String,
    cvv: String,
    network: Option<String>,
    bank: String,
    country: String,
    ok: bool,
    reason_code: Option<String>,
}

#[wasm_bindgen]
impl BulkRow {
    #[wasm_bindgen(getter)]
    pub fn line(&self) -> usize {
        self.line
    }

    #[wasm_bindgen(getter)]
    pub fn number(&self) -> String {
        self.number.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn expiry(&self) -> String {
        self.expiry.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn cvv(&self) -> String {
        self.cvv.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn network(&self) -> Option<String> {
        self.network.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn bank(&self) -> String {
        self.bank.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn country(&self) -> String {
        self.country.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn ok(&self) -> bool {
        self.ok
    }

    #[wasm_bindgen(getter)]
    pub fn reason_code(&self) -> Option<String> {
        self.reason_code.clone()
    }
}

impl From<&BulkResult> for BulkRow {
    fn from(result: &BulkResult) -> Self {
        Self {
            line: result.line,
            number: result.entry.number.clone(),
            expiry: result.entry.expiry.clone(),
            cvv: result.entry.cvv.clone(),
            network: result.network.map(|n: Network| n.display_name().to_string()),
            bank: result.issuer.bank.to_string(),
            country: result.issuer.country.to_string(),
            ok: result.verdict.ok,
            reason_code: result.verdict.reason_code.map(|c| c.as_str().to_string()),
        }
    }
}

/// Parses bulk text; lines without a number are left out.
#[wasm_bindgen]
pub fn parse_bulk(text: &str) -> js_sys::Array {
    let report = crate::parse_bulk(text, today());
    let rows = js_sys::Array::new();
    for result in &report.results {
        rows.push(&JsValue::from(BulkRow::from(result)));
    }
    rows
}

/// Batch check of several card numbers.
#[wasm_bindgen]
pub fn check_batch(card_numbers: js_sys::Array) -> js_sys::Array {
    let results = js_sys::Array::new();
    for card in card_numbers.iter() {
        if let Some(card_str) = card.as_string() {
            results.push(&JsValue::from(check_card(&card_str, None, None, false)));
        }
    }
    results
}
