//! Bulk text parsing example.
//!
//! Run with: `cargo run --example bulk`

use cc_checker::bulk::{parse_bulk, Filter};
use cc_checker::session::Session;
use cc_checker::{CheckerConfig, ValidateOptions, YearMonth};

const INPUT: &str = "\
5255 9391 0489 8994 | 05/26 | 244
5555555555554444 05/26 | 244
4546 5691 4776 4006 10 29 564
4111 1111 1111 1111 05/26 123
378282246310005 1234 12 29

not a card line
";

fn main() {
    println!("=== Bulk Parsing ===\n");

    let today = YearMonth::current();
    let report = parse_bulk(INPUT, today);

    // -------------------------------------------------------------------------
    // Parsed lines
    // -------------------------------------------------------------------------
    println!("--- Parsed Lines ---\n");
    for result in &report.results {
        println!(
            "  line {} [{}]: {} exp {} cvv {} -> {}",
            result.line,
            result.entry.format,
            cc_checker::format_for_display(&result.entry.number),
            result.entry.expiry,
            result.entry.cvv,
            result.verdict.message
        );
    }
    println!();

    let summary = report.summary();
    println!(
        "  total: {}, valid: {}, invalid: {}, dropped: {}\n",
        summary.total, summary.valid, summary.invalid, summary.dropped
    );

    // -------------------------------------------------------------------------
    // Text export
    // -------------------------------------------------------------------------
    println!("--- Valid Only ---\n");
    println!("{}\n", report.to_text(Filter::Valid));

    println!("--- Invalid Only ---\n");
    println!("{}\n", report.to_text(Filter::Invalid));

    // -------------------------------------------------------------------------
    // Live-checking the parsed entries through a session
    // -------------------------------------------------------------------------
    println!("--- Live Check ---\n");
    let mut session = Session::new(CheckerConfig::default().without_delay());
    for result in report.filter(Filter::Valid) {
        let options = ValidateOptions::live(result.entry.expiry.as_str(), result.entry.cvv.as_str());
        let verdict = session.check(&result.entry.number, &options, today);
        println!("  line {}: {}", result.line, verdict.message);
    }
    println!();

    println!("  History ({} of {}):", session.history().len(), session.history().capacity());
    for record in session.history().iter() {
        println!(
            "    {} {} {}",
            record.timestamp.format("%H:%M:%S"),
            record.masked(),
            if record.ok() { "ok" } else { "failed" }
        );
    }
}
