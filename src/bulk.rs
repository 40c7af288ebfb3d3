//! Bulk text parsing.
//!
//! Each non-blank line is handed to an ordered list of line formats; the
//! first one that recognizes the line extracts a number, expiry and CVV.
//! The number then goes through the validator (without a live check) and is
//! attributed a bank and country from the static table.
//!
//! Recognized layouts, in priority order:
//!
//! | Format | Example |
//! |--------|---------|
//! | [`LineFormat::PipeTriple`] | `5255 9391 0489 8994 \| 05/26 \| 244` |
//! | [`LineFormat::PipePair`] | `5555555555554444 05/26 \| 244` |
//! | [`LineFormat::SpacedMonthYear`] | `4546 5691 4776 4006 10 29 564` |
//! | [`LineFormat::SpacedSlashExpiry`] | `4111 1111 1111 1111 05/26 123` |
//! | [`LineFormat::SpacedFallback`] | `4111111111111111 123 05 26` |
//!
//! Lines that yield no number digits are dropped, not reported. The
//! report's `lines_read` and `dropped` counters expose the difference.
//!
//! # Example
//!
//! ```
//! use cc_checker::bulk::{parse_bulk, LineFormat};
//! use cc_checker::YearMonth;
//!
//! let text = "5255 9391 0489 8994 | 05/26 | 244\n\nno digits here\n4546 5691 4776 4006 10 29 564";
//! let report = parse_bulk(text, YearMonth::new(2025, 6).unwrap());
//!
//! assert_eq!(report.results.len(), 2);
//! assert_eq!(report.dropped, 1);
//!
//! let first = &report.results[0];
//! assert_eq!(first.entry.number, "5255939104898994");
//! assert_eq!(first.entry.expiry, "05/26");
//! assert_eq!(first.entry.cvv, "244");
//! assert_eq!(first.entry.format, LineFormat::PipeTriple);
//! ```

use crate::bin::{Issuer, StaticBinTable};
use crate::card::{extract_digits, Network};
use crate::expiry::YearMonth;
use crate::format::{format_for_display, strip_non_digits};
use crate::validate::{validate, ValidateOptions, ValidationVerdict};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::debug;

static MONTH_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0[1-9]|1[0-2])$").expect("month pattern is a valid regex"));

static SHORT_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}$").expect("short number pattern is a valid regex"));

/// Layouts the parser recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LineFormat {
    /// `number | expiry | cvv`; extra pipe fields are ignored.
    PipeTriple,
    /// `number... expiry | cvv`
    PipePair,
    /// At least seven tokens: `number... month year cvv`.
    SpacedMonthYear,
    /// `number... MM/YY cvv`
    SpacedSlashExpiry,
    /// `number... cvv month year` when the second-to-last token looks like
    /// a month, `number... expiry cvv` otherwise.
    SpacedFallback,
}

impl LineFormat {
    /// Every format, in the order they are tried.
    pub const ORDER: [LineFormat; 5] = [
        LineFormat::PipeTriple,
        LineFormat::PipePair,
        LineFormat::SpacedMonthYear,
        LineFormat::SpacedSlashExpiry,
        LineFormat::SpacedFallback,
    ];

    /// Extracts raw `(number, expiry, cvv)` fields when the line has this
    /// format. Fields are returned as written.
    fn extract(&self, line: &str) -> Option<RawFields> {
        let piped = line.contains('|');
        match self {
            Self::PipeTriple => {
                let parts: Vec<&str> = line.split('|').map(str::trim).collect();
                if parts.len() < 3 {
                    return None;
                }
                Some(RawFields::new(parts[0], parts[1], parts[2]))
            }
            Self::PipePair => {
                let parts: Vec<&str> = line.split('|').map(str::trim).collect();
                if parts.len() != 2 {
                    return None;
                }
                let tokens: Vec<&str> = parts[0].split_whitespace().collect();
                let (expiry, number) = tokens.split_last()?;
                if number.is_empty() {
                    return None;
                }
                Some(RawFields::new(&number.concat(), expiry, parts[1]))
            }
            Self::SpacedMonthYear => {
                let tokens = spaced_tokens(line, piped, 7)?;
                let n = tokens.len();
                let expiry = format!("{:0>2}/{:0>2}", tokens[n - 3], tokens[n - 2]);
                Some(RawFields::new(&tokens[..n - 3].concat(), &expiry, tokens[n - 1]))
            }
            Self::SpacedSlashExpiry => {
                let tokens = spaced_tokens(line, piped, 3)?;
                let n = tokens.len();
                if !tokens[n - 2].contains('/') {
                    return None;
                }
                Some(RawFields::new(&tokens[..n - 2].concat(), tokens[n - 2], tokens[n - 1]))
            }
            Self::SpacedFallback => {
                let tokens = spaced_tokens(line, piped, 3)?;
                let n = tokens.len();
                if MONTH_TOKEN.is_match(tokens[n - 2]) {
                    let expiry = format!("{}/{}", tokens[n - 2], tokens[n - 1]);
                    Some(RawFields::new(&tokens[..n - 3].concat(), &expiry, tokens[n - 3]))
                } else {
                    Some(RawFields::new(&tokens[..n - 2].concat(), tokens[n - 2], tokens[n - 1]))
                }
            }
        }
    }
}

impl fmt::Display for LineFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PipeTriple => "pipe-triple",
            Self::PipePair => "pipe-pair",
            Self::SpacedMonthYear => "spaced-month-year",
            Self::SpacedSlashExpiry => "spaced-slash-expiry",
            Self::SpacedFallback => "spaced-fallback",
        };
        f.write_str(name)
    }
}

fn spaced_tokens(line: &str, piped: bool, min: usize) -> Option<Vec<&str>> {
    if piped {
        return None;
    }
    let tokens: Vec<&str> = line.split_whitespace().collect();
    (tokens.len() >= min).then_some(tokens)
}

struct RawFields {
    number: String,
    expiry: String,
    cvv: String,
}

impl RawFields {
    fn new(number: &str, expiry: &str, cvv: &str) -> Self {
        Self {
            number: number.to_string(),
            expiry: expiry.to_string(),
            cvv: cvv.to_string(),
        }
    }
}

/// The fields recovered from one line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BulkEntry {
    /// Format that recognized the line.
    pub format: LineFormat,
    /// Number digits.
    pub number: String,
    /// Expiry, normalized to `MM/YY` where possible.
    pub expiry: String,
    /// CVV digits.
    pub cvv: String,
}

/// Brings a slash-less expiry into `MM/YY` form.
///
/// Two space-separated parts are joined with `/`. A lone one or two digit
/// value is a month when it is 1-12 (paired with next year), otherwise a
/// year (paired with January). Anything else is returned unchanged.
///
/// ```
/// use cc_checker::bulk::normalize_expiry;
/// use cc_checker::YearMonth;
///
/// let today = YearMonth::new(2025, 6).unwrap();
/// assert_eq!(normalize_expiry("10 29", today), "10/29");
/// assert_eq!(normalize_expiry("7", today), "07/26");
/// assert_eq!(normalize_expiry("29", today), "01/29");
/// assert_eq!(normalize_expiry("05/26", today), "05/26");
/// ```
pub fn normalize_expiry(expiry: &str, today: YearMonth) -> String {
    let expiry = expiry.trim();
    if expiry.is_empty() || expiry.contains('/') {
        return expiry.to_string();
    }
    let parts: Vec<&str> = expiry.split_whitespace().collect();
    if parts.len() == 2 {
        return format!("{}/{}", parts[0], parts[1]);
    }
    if SHORT_NUMBER.is_match(expiry) {
        let value: u16 = expiry.parse().unwrap_or(0);
        return if (1..=12).contains(&value) {
            format!("{:02}/{:02}", value, (today.year() + 1) % 100)
        } else {
            format!("01/{:0>2}", expiry)
        };
    }
    expiry.to_string()
}

/// Parses one line; `None` when no format yields number digits.
///
/// ```
/// use cc_checker::bulk::{parse_line, LineFormat};
/// use cc_checker::YearMonth;
///
/// let today = YearMonth::new(2025, 6).unwrap();
/// let entry = parse_line("5555555555554444 05/26 | 244", today).unwrap();
/// assert_eq!(entry.format, LineFormat::PipePair);
/// assert_eq!(entry.number, "5555555555554444");
///
/// assert!(parse_line("   ", today).is_none());
/// assert!(parse_line("name | date | code", today).is_none());
/// ```
pub fn parse_line(line: &str, today: YearMonth) -> Option<BulkEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (format, raw) = LineFormat::ORDER
        .iter()
        .find_map(|format| format.extract(line).map(|raw| (*format, raw)))?;

    let number = strip_non_digits(&raw.number);
    if number.is_empty() {
        return None;
    }
    Some(BulkEntry {
        format,
        number,
        expiry: normalize_expiry(&raw.expiry, today),
        cvv: strip_non_digits(&raw.cvv),
    })
}

/// One parsed line with its verdict and attribution.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BulkResult {
    /// 1-based line number in the input.
    pub line: usize,
    /// Parsed fields.
    pub entry: BulkEntry,
    /// Validator verdict for the number.
    pub verdict: ValidationVerdict,
    /// Detected network.
    pub network: Option<Network>,
    /// Bank and country from the static table.
    pub issuer: Issuer,
}

impl BulkResult {
    /// Validates and attributes a parsed entry.
    pub fn check(line: usize, entry: BulkEntry, today: YearMonth) -> Self {
        let options = ValidateOptions::new().expiry(entry.expiry.as_str()).cvv(entry.cvv.as_str());
        let verdict = validate(&entry.number, &options, today);
        let issuer = StaticBinTable::issuer_for(&extract_digits(&entry.number));
        Self {
            line,
            network: verdict.network,
            entry,
            verdict,
            issuer,
        }
    }

    /// Whether the number validated.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.verdict.ok
    }

    /// One row of the text export.
    pub fn to_row(&self) -> String {
        format!(
            "{} | {} | {} | {} | {} | {} | {}",
            format_for_display(&self.entry.number),
            self.network.map_or("Unknown", |n| n.display_name()),
            self.entry.cvv,
            self.entry.expiry,
            self.issuer.bank,
            self.issuer.country,
            if self.is_valid() { "Valid" } else { "Invalid" }
        )
    }
}

/// Which results a report view includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Filter {
    /// Every result.
    #[default]
    All,
    /// Valid numbers only.
    Valid,
    /// Invalid numbers only.
    Invalid,
}

impl Filter {
    fn accepts(&self, result: &BulkResult) -> bool {
        match self {
            Self::All => true,
            Self::Valid => result.is_valid(),
            Self::Invalid => !result.is_valid(),
        }
    }
}

/// Counts over a bulk report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BulkSummary {
    /// Results reported.
    pub total: usize,
    /// Results whose number validated.
    pub valid: usize,
    /// Results whose number did not validate.
    pub invalid: usize,
    /// Non-blank lines that yielded no number.
    pub dropped: usize,
}

/// Header of [`BulkReport::to_text`].
pub const REPORT_HEADER: &str = "Card No | Card Type | CVV | Expiry | Bank | Country | Status";

/// Results of a bulk parse, in input order.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BulkReport {
    /// Parsed lines.
    pub results: Vec<BulkResult>,
    /// Non-blank lines seen.
    pub lines_read: usize,
    /// Non-blank lines dropped for lack of a number.
    pub dropped: usize,
}

impl BulkReport {
    /// Adds the outcome of one non-blank line.
    pub fn push(&mut self, result: Option<BulkResult>) {
        self.lines_read += 1;
        match result {
            Some(result) => self.results.push(result),
            None => self.dropped += 1,
        }
    }

    /// Valid, invalid and dropped counts.
    pub fn summary(&self) -> BulkSummary {
        let valid = self.results.iter().filter(|r| r.is_valid()).count();
        BulkSummary {
            total: self.results.len(),
            valid,
            invalid: self.results.len() - valid,
            dropped: self.dropped,
        }
    }

    /// Results accepted by `filter`.
    pub fn filter(&self, filter: Filter) -> impl Iterator<Item = &BulkResult> {
        self.results.iter().filter(move |r| filter.accepts(r))
    }

    /// Plain-text export of the results accepted by `filter`.
    pub fn to_text(&self, filter: Filter) -> String {
        let mut out = String::from(REPORT_HEADER);
        for result in self.filter(filter) {
            out.push('\n');
            out.push_str(&result.to_row());
        }
        out
    }
}

/// Parses every line of `text` and validates the recovered numbers.
pub fn parse_bulk(text: &str, today: YearMonth) -> BulkReport {
    let mut report = BulkReport::default();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        report.push(check_line(index + 1, line, today));
    }
    debug!(
        lines = report.lines_read,
        parsed = report.results.len(),
        dropped = report.dropped,
        "bulk text parsed"
    );
    report
}

/// Parses and checks a single numbered line.
pub fn check_line(line_number: usize, line: &str, today: YearMonth) -> Option<BulkResult> {
    let entry = parse_line(line, today)?;
    Some(BulkResult::check(line_number, entry, today))
}
