//! Test card generation example.
//!
//! Run with: `cargo run --example generate`

use cc_checker::generate::{export_lines, generate_for, generate_many, ExportFormat, GenerateTarget};
use cc_checker::{is_valid, CheckerConfig, Network, YearMonth};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    println!("=== Test Card Generation ===\n");

    let today = YearMonth::current();
    let config = CheckerConfig::default();
    let mut rng = rand::thread_rng();

    // -------------------------------------------------------------------------
    // Generate cards for each network
    // -------------------------------------------------------------------------
    println!("--- Generate Cards by Network ---\n");

    for network in Network::ALL {
        let card = generate_for(network, &mut rng, today, &config);
        println!(
            "  {:16}: {:22} {} {:4} {} ({})",
            network.display_name(),
            card.formatted(),
            card.expiry,
            card.cvv,
            card.bank,
            card.country_code
        );
    }
    println!();

    // -------------------------------------------------------------------------
    // Seeded generation (for reproducible tests)
    // -------------------------------------------------------------------------
    println!("--- Seeded Generation ---\n");

    println!("  Generating with the same seed multiple times:");
    for i in 0..3 {
        let mut seeded = StdRng::seed_from_u64(42);
        let card = generate_for(Network::Visa, &mut seeded, today, &config);
        println!("    Run {}: {}", i + 1, card.formatted());
    }
    println!("  (All cards are identical - same seed)\n");

    // -------------------------------------------------------------------------
    // Spread across the primary networks
    // -------------------------------------------------------------------------
    println!("--- All Networks ---\n");

    let cards = generate_many(GenerateTarget::All, 12, &mut rng, today, &config);
    println!("  Pipe export:");
    for line in export_lines(&cards, ExportFormat::Pipe).lines() {
        println!("    {}", line);
    }
    println!("  Spaced export:");
    for line in export_lines(&cards, ExportFormat::Spaced).lines() {
        println!("    {}", line);
    }
    println!();

    // -------------------------------------------------------------------------
    // Verify all generated cards are valid
    // -------------------------------------------------------------------------
    println!("--- Validation Check ---\n");

    let test_count = 1000;
    let mut all_valid = true;

    for network in Network::ALL {
        let mut produced = 0;
        let mut valid_count = 0;
        for _ in 0..test_count {
            let card = generate_for(network, &mut rng, today, &config);
            if let Some(number) = &card.number {
                produced += 1;
                if is_valid(&number.number()) {
                    valid_count += 1;
                }
            }
        }
        let success = valid_count == produced;
        if !success {
            all_valid = false;
        }
        println!(
            "  {:16}: {}/{} valid, {} gave up ({})",
            network.display_name(),
            valid_count,
            produced,
            test_count - produced,
            if success { "PASS" } else { "FAIL" }
        );
    }
    println!();

    if all_valid {
        println!("  All generated cards pass validation!");
    } else {
        println!("  WARNING: Some generated cards failed validation!");
    }
}
