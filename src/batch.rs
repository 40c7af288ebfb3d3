//! Batch validation, bulk parsing and generation.
//!
//! The sequential functions are always available; the `_parallel` variants
//! use rayon and require the `parallel` feature. Every variant returns
//! results in input order.

use crate::bulk::{check_line, BulkReport, BulkResult};
use crate::config::CheckerConfig;
use crate::error::Rejection;
use crate::expiry::YearMonth;
use crate::generate::{generate, GenerateTarget, GeneratedCard};
use crate::validate::{check_number, ValidCard};

/// Batch number checker.
///
/// # Example
///
/// ```
/// use cc_checker::BatchValidator;
///
/// let batch = BatchValidator::new();
/// let cards = vec!["4532015112830366", "5425233430109903", "378282246310005"];
/// let results = batch.check_all(&cards);
///
/// for (card, result) in cards.iter().zip(results.iter()) {
///     match result {
///         Ok(valid) => println!("{}: {} valid", card, valid.network()),
///         Err(e) => println!("{}: invalid - {}", card, e),
///     }
/// }
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchValidator {
    _private: (),
}

impl BatchValidator {
    /// Creates a batch checker.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks every number, in input order.
    pub fn check_all<S: AsRef<str>>(&self, cards: &[S]) -> Vec<Result<ValidCard, Rejection>> {
        cards.iter().map(|c| check_number(c.as_ref())).collect()
    }

    /// Returns only the valid cards.
    pub fn valid_only<S: AsRef<str>>(&self, cards: &[S]) -> Vec<ValidCard> {
        cards
            .iter()
            .filter_map(|c| check_number(c.as_ref()).ok())
            .collect()
    }

    /// Splits into valid cards and `(index, rejection)` pairs.
    pub fn partitioned<S: AsRef<str>>(
        &self,
        cards: &[S],
    ) -> (Vec<ValidCard>, Vec<(usize, Rejection)>) {
        let mut valid = Vec::new();
        let mut invalid = Vec::new();

        for (i, card) in cards.iter().enumerate() {
            match check_number(card.as_ref()) {
                Ok(c) => valid.push(c),
                Err(e) => invalid.push((i, e)),
            }
        }

        (valid, invalid)
    }

    /// Checks every number in parallel.
    #[cfg(feature = "parallel")]
    pub fn check_parallel<S: AsRef<str> + Sync>(
        &self,
        cards: &[S],
    ) -> Vec<Result<ValidCard, Rejection>> {
        use rayon::prelude::*;
        cards.par_iter().map(|c| check_number(c.as_ref())).collect()
    }
}

/// Counts valid and invalid numbers.
///
/// ```
/// use cc_checker::batch::count_valid;
///
/// let cards = ["4532015112830366", "1234567890123456", "5425233430109903"];
/// assert_eq!(count_valid(&cards), (2, 1));
/// ```
pub fn count_valid<S: AsRef<str>>(cards: &[S]) -> (usize, usize) {
    let valid = cards.iter().filter(|c| check_number(c.as_ref()).is_ok()).count();
    (valid, cards.len() - valid)
}

/// Counts valid and invalid numbers in parallel.
#[cfg(feature = "parallel")]
pub fn count_valid_parallel<S: AsRef<str> + Sync>(cards: &[S]) -> (usize, usize) {
    use rayon::prelude::*;
    let valid = cards
        .par_iter()
        .filter(|c| check_number(c.as_ref()).is_ok())
        .count();
    (valid, cards.len() - valid)
}

fn collect_report(outcomes: Vec<Option<BulkResult>>) -> BulkReport {
    let mut report = BulkReport::default();
    for outcome in outcomes {
        report.push(outcome);
    }
    report
}

/// Parses bulk text with lines processed in parallel.
///
/// Produces the same report as [`crate::bulk::parse_bulk`].
#[cfg(feature = "parallel")]
pub fn parse_bulk_parallel(text: &str, today: YearMonth) -> BulkReport {
    use rayon::prelude::*;
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .collect();
    let outcomes = lines
        .par_iter()
        .map(|&(index, line)| check_line(index + 1, line, today))
        .collect();
    collect_report(outcomes)
}

/// Parses a slice of lines as bulk input; line numbers are 1-based indexes
/// into `lines`.
pub fn parse_lines<S: AsRef<str>>(lines: &[S], today: YearMonth) -> BulkReport {
    let outcomes = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.as_ref().trim().is_empty())
        .map(|(index, line)| check_line(index + 1, line.as_ref(), today))
        .collect();
    collect_report(outcomes)
}

/// Generates `count` cards, each from its own RNG seeded with
/// `seed + index`, so the output depends only on the seed.
///
/// `GenerateTarget::All` is treated as `Random` here.
pub fn generate_seeded(
    target: GenerateTarget,
    count: usize,
    seed: u64,
    today: YearMonth,
    config: &CheckerConfig,
) -> Vec<GeneratedCard> {
    (0..count)
        .map(|i| generate_one(target, seed, i, today, config))
        .collect()
}

/// Parallel form of [`generate_seeded`]; produces identical output.
#[cfg(feature = "parallel")]
pub fn generate_seeded_parallel(
    target: GenerateTarget,
    count: usize,
    seed: u64,
    today: YearMonth,
    config: &CheckerConfig,
) -> Vec<GeneratedCard> {
    use rayon::prelude::*;
    (0..count)
        .into_par_iter()
        .map(|i| generate_one(target, seed, i, today, config))
        .collect()
}

fn generate_one(
    target: GenerateTarget,
    seed: u64,
    index: usize,
    today: YearMonth,
    config: &CheckerConfig,
) -> GeneratedCard {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64));
    generate(target, &mut rng, today, config)
}
