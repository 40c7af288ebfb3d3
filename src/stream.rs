//! Streaming validation and bulk parsing.
//!
//! [`ValidateExt`] adds number checks to any iterator of strings, and
//! [`BulkLines`] parses bulk text from a reader line by line without loading
//! it all into memory.
//!
//! # Example
//!
//! ```
//! use cc_checker::stream::ValidateExt;
//!
//! let cards = vec!["4532015112830366", "5425233430109903", "invalid"];
//! let valid_count = cards.iter()
//!     .copied()
//!     .check_numbers()
//!     .filter(|r| r.is_ok())
//!     .count();
//!
//! assert_eq!(valid_count, 2);
//! ```

use crate::bulk::{check_line, BulkReport, BulkResult};
use crate::error::Rejection;
use crate::expiry::YearMonth;
use crate::validate::{check_number, ValidCard};
use std::io::BufRead;

/// Checks each string of the wrapped iterator.
///
/// Created by [`ValidateExt::check_numbers`].
#[derive(Debug, Clone)]
pub struct CheckStream<I> {
    inner: I,
}

impl<I> CheckStream<I> {
    /// Wraps an iterator.
    #[inline]
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    /// Returns the wrapped iterator.
    #[inline]
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I, S> Iterator for CheckStream<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Result<ValidCard, Rejection>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|s| check_number(s.as_ref()))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<I, S> ExactSizeIterator for CheckStream<I>
where
    I: ExactSizeIterator<Item = S>,
    S: AsRef<str>,
{
}

/// Yields only the numbers that pass.
#[derive(Debug, Clone)]
pub struct ValidOnlyStream<I> {
    inner: I,
}

impl<I> ValidOnlyStream<I> {
    /// Wraps an iterator.
    #[inline]
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<I, S> Iterator for ValidOnlyStream<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = ValidCard;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find_map(|s| check_number(s.as_ref()).ok())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

/// Extension trait adding number checks to iterators of strings.
pub trait ValidateExt: Iterator + Sized {
    /// Checks every item, yielding `Result<ValidCard, Rejection>`.
    fn check_numbers(self) -> CheckStream<Self>;

    /// Checks every item and yields only the valid cards.
    ///
    /// ```
    /// use cc_checker::stream::ValidateExt;
    ///
    /// let cards = ["4532015112830366", "invalid", "378282246310005"];
    /// let valid: Vec<_> = cards.iter().copied().valid_only().collect();
    /// assert_eq!(valid.len(), 2);
    /// ```
    fn valid_only(self) -> ValidOnlyStream<Self>;
}

impl<I: Iterator + Sized> ValidateExt for I {
    #[inline]
    fn check_numbers(self) -> CheckStream<Self> {
        CheckStream::new(self)
    }

    #[inline]
    fn valid_only(self) -> ValidOnlyStream<Self> {
        ValidOnlyStream::new(self)
    }
}

/// Bulk parser over a reader.
///
/// Yields one result per recognized line. Blank lines are skipped; other
/// lines without a number are counted in [`dropped`](Self::dropped).
///
/// ```
/// use cc_checker::stream::BulkLines;
/// use cc_checker::YearMonth;
///
/// let input = "4532015112830366 | 12/27 | 123\njunk\n";
/// let mut lines = BulkLines::new(input.as_bytes(), YearMonth::new(2025, 6).unwrap());
/// let results: Vec<_> = lines.by_ref().collect::<Result<_, _>>().unwrap();
///
/// assert_eq!(results.len(), 1);
/// assert_eq!(lines.dropped(), 1);
/// ```
#[derive(Debug)]
pub struct BulkLines<R> {
    reader: R,
    today: YearMonth,
    buf: String,
    line_number: usize,
    lines_read: usize,
    dropped: usize,
}

impl<R: BufRead> BulkLines<R> {
    /// Parses lines from `reader`.
    pub fn new(reader: R, today: YearMonth) -> Self {
        Self {
            reader,
            today,
            buf: String::new(),
            line_number: 0,
            lines_read: 0,
            dropped: 0,
        }
    }

    /// Non-blank lines seen so far.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Non-blank lines dropped so far.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Drains the reader into a report.
    pub fn into_report(self) -> std::io::Result<BulkReport> {
        let mut report = BulkReport::default();
        let mut lines = self;
        for result in lines.by_ref() {
            report.results.push(result?);
        }
        report.lines_read = lines.lines_read;
        report.dropped = lines.dropped;
        Ok(report)
    }
}

impl<R: BufRead> Iterator for BulkLines<R> {
    type Item = std::io::Result<BulkResult>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }
            self.line_number += 1;
            if self.buf.trim().is_empty() {
                continue;
            }
            self.lines_read += 1;
            match check_line(self.line_number, &self.buf, self.today) {
                Some(result) => return Some(Ok(result)),
                None => self.dropped += 1,
            }
        }
    }
}
