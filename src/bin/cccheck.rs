//! CLI tool for card checking.
//!
//! # Usage
//!
//! ```bash
//! # Classify a (partial) number
//! cccheck classify 6011
//!
//! # Validate a number, optionally with a simulated live check
//! cccheck validate 4532015112830366
//! cccheck validate 378282246310005 --live --expiry 12/27 --cvv 1234
//!
//! # Generate test cards
//! cccheck generate --network all --count 12 --seed 7
//!
//! # Parse a bulk list from a file or stdin
//! cccheck bulk cards.txt --filter valid
//!
//! # Issuer metadata for a BIN
//! cccheck lookup 453201
//! ```

use cc_checker::bin::{BinInfo, MemoryBinDb};
use cc_checker::bulk::{BulkReport, Filter};
use cc_checker::generate::{export_lines, ExportFormat, GenerateTarget};
use cc_checker::session::Session;
use cc_checker::stream::BulkLines;
use cc_checker::{
    classify, classify_bin, format, luhn_check_digit, luhn_valid, CheckerConfig, ValidateOptions,
    YearMonth,
};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use serde_json::json;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cccheck")]
#[command(
    author,
    version,
    about = "Payment card classification, validation and test-card generation"
)]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the network of a (partial) card number
    Classify {
        /// Card number or prefix (separators allowed)
        card_number: String,
    },

    /// Check the first six digits against the network catalog
    Bin {
        /// Card number or BIN
        card_number: String,
    },

    /// Check if a number passes the Luhn algorithm
    Luhn {
        /// Card number to check
        card_number: String,
    },

    /// Compute the Luhn check digit for a partial number
    CheckDigit {
        /// Number without its check digit
        partial: String,
    },

    /// Validate a card number
    Validate {
        /// Card number to validate (spaces and dashes allowed)
        card_number: String,

        /// Run the simulated live check
        #[arg(short, long)]
        live: bool,

        /// Expiry as MM/YY (live check)
        #[arg(short, long)]
        expiry: Option<String>,

        /// CVV (live check)
        #[arg(short, long)]
        cvv: Option<String>,
    },

    /// Generate test cards (for testing only)
    Generate {
        /// Network id, "random" or "all"
        #[arg(short, long, default_value = "random")]
        network: String,

        /// Number of cards to generate
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Seed for reproducible output
        #[arg(short, long)]
        seed: Option<u64>,

        /// Line layout of the text output
        #[arg(long, default_value = "pipe")]
        export: ExportArg,
    },

    /// Parse a bulk card list
    Bulk {
        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,

        /// Which results to print
        #[arg(short, long, default_value = "all")]
        filter: FilterArg,
    },

    /// Format a card number for display
    Format {
        /// Card number to format
        card_number: String,

        /// Separator to use
        #[arg(short, long, default_value = " ")]
        separator: String,
    },

    /// Look up issuer metadata for a BIN
    Lookup {
        /// BIN (6-8 digits) or full card number
        bin: String,

        /// BIN database file (.json, .csv or .sqlite)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportArg {
    Pipe,
    Spaced,
}

impl From<ExportArg> for ExportFormat {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Pipe => ExportFormat::Pipe,
            ExportArg::Spaced => ExportFormat::Spaced,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    All,
    Valid,
    Invalid,
}

impl From<FilterArg> for Filter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => Filter::All,
            FilterArg::Valid => Filter::Valid,
            FilterArg::Invalid => Filter::Invalid,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    let json = cli.json;

    match cli.command {
        Commands::Classify { card_number } => cmd_classify(&card_number, json),
        Commands::Bin { card_number } => cmd_bin(&card_number, json),
        Commands::Luhn { card_number } => cmd_luhn(&card_number, json),
        Commands::CheckDigit { partial } => cmd_check_digit(&partial, json),
        Commands::Validate {
            card_number,
            live,
            expiry,
            cvv,
        } => {
            let options = ValidateOptions {
                expiry,
                cvv,
                live_check: live,
            };
            cmd_validate(&card_number, &options, config, json);
        }
        Commands::Generate {
            network,
            count,
            seed,
            export,
        } => cmd_generate(&network, count, seed, export.into(), &config, json),
        Commands::Bulk { file, filter } => cmd_bulk(file.as_deref(), filter.into(), json),
        Commands::Format {
            card_number,
            separator,
        } => cmd_format(&card_number, &separator, json),
        Commands::Lookup { bin, db } => cmd_lookup(&bin, db.as_deref(), config, json),
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(2);
}

fn load_config(path: Option<&Path>) -> CheckerConfig {
    match path {
        Some(path) => CheckerConfig::from_json_file(path).unwrap_or_else(|e| fail(e)),
        None => CheckerConfig::default(),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(out) => println!("{}", out),
        Err(e) => fail(e),
    }
}

fn cmd_classify(card_number: &str, json: bool) {
    let classification = classify(card_number);
    if json {
        print_json(&classification);
    } else {
        match &classification {
            Some(c) => {
                println!("Network: {}", c.network.display_name());
                println!("Rule: {}", c.label);
                println!("Valid Lengths: {:?}", c.valid_lengths);
                println!("Luhn: {}", if c.uses_checksum { "required" } else { "exempt" });
            }
            None => println!("Network: Unknown"),
        }
    }
    if classification.is_none() {
        process::exit(1);
    }
}

fn cmd_bin(card_number: &str, json: bool) {
    let Some(check) = classify_bin(card_number) else {
        fail("a BIN needs at least 6 digits");
    };
    if json {
        print_json(&check);
    } else {
        println!("BIN: {}", check.bin);
        println!("Valid: {}", if check.valid { "yes" } else { "no" });
        if let (Some(network), Some(label)) = (check.network, check.label) {
            println!("Network: {} ({})", network.display_name(), label);
        }
    }
    if !check.valid {
        process::exit(1);
    }
}

fn cmd_luhn(card_number: &str, json: bool) {
    let valid = luhn_valid(card_number);
    if json {
        print_json(&json!({ "luhn_valid": valid }));
    } else {
        println!("Luhn check: {}", if valid { "PASS" } else { "FAIL" });
    }
    if !valid {
        process::exit(1);
    }
}

fn cmd_check_digit(partial: &str, json: bool) {
    let digit = luhn_check_digit(partial);
    let digits = format::strip_non_digits(partial);
    if json {
        print_json(&json!({ "check_digit": digit, "number": format!("{}{}", digits, digit) }));
    } else {
        println!("Check digit: {}", digit);
        println!("Number: {}{}", digits, digit);
    }
}

fn cmd_validate(card_number: &str, options: &ValidateOptions, config: CheckerConfig, json: bool) {
    let mut session = Session::new(config);
    let verdict = session.check(card_number, options, YearMonth::current());

    if json {
        print_json(&verdict);
    } else if verdict.ok {
        println!("Valid: yes");
        if let Some(network) = verdict.network {
            println!("Network: {}", network.display_name());
        }
        if let Some(record) = session.history().latest() {
            println!("Masked: {}", record.masked());
        }
        if let Some(score) = verdict.score {
            println!("Live check score: {}/{}", score, CheckerConfig::MAX_LIVE_SCORE);
        }
    } else {
        println!("Valid: no");
        if let Some(code) = verdict.reason_code {
            println!("Reason: {}", code.as_str());
        }
        println!("Error: {}", verdict.message);
    }

    if !verdict.ok {
        process::exit(1);
    }
}

fn cmd_generate(
    network: &str,
    count: usize,
    seed: Option<u64>,
    export: ExportFormat,
    config: &CheckerConfig,
    json: bool,
) {
    let target: GenerateTarget = network.parse().unwrap_or_else(|e| fail(e));
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let cards =
        cc_checker::generate::generate_many(target, count, &mut rng, YearMonth::current(), config);

    if json {
        print_json(&cards);
        return;
    }
    let lines = export_lines(&cards, export);
    if !lines.is_empty() {
        println!("{}", lines);
    }
    let exhausted = cards.iter().filter(|c| c.number.is_none()).count();
    if exhausted > 0 {
        eprintln!("{} card(s) could not be generated", exhausted);
    }
}

fn read_report(file: Option<&Path>) -> io::Result<BulkReport> {
    let today = YearMonth::current();
    match file {
        Some(path) => {
            let reader = BufReader::new(std::fs::File::open(path)?);
            BulkLines::new(reader, today).into_report()
        }
        None => BulkLines::new(io::stdin().lock(), today).into_report(),
    }
}

fn cmd_bulk(file: Option<&Path>, filter: Filter, json: bool) {
    let report = read_report(file).unwrap_or_else(|e| fail(e));
    let summary = report.summary();

    if json {
        let results: Vec<_> = report.filter(filter).collect();
        print_json(&json!({ "summary": summary, "results": results }));
    } else {
        println!("{}", report.to_text(filter));
        println!();
        println!(
            "Total: {}  Valid: {}  Invalid: {}  Dropped: {}",
            summary.total, summary.valid, summary.invalid, summary.dropped
        );
    }
}

fn cmd_format(card_number: &str, separator: &str, json: bool) {
    let formatted = format::format_with_separator(card_number, separator);
    if json {
        print_json(&json!({ "formatted": formatted }));
    } else {
        println!("{}", formatted);
    }
}

fn load_db(path: &Path) -> Result<MemoryBinDb, String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        #[cfg(feature = "bin-json")]
        "json" => cc_checker::bin::JsonBinLoader::from_file(path).map_err(|e| e.to_string()),
        #[cfg(feature = "bin-csv")]
        "csv" => cc_checker::bin::CsvBinLoader::from_file(path).map_err(|e| e.to_string()),
        #[cfg(feature = "bin-sqlite")]
        "sqlite" | "db" => cc_checker::bin::SqliteBinDb::open(path)
            .and_then(|db| db.load_all())
            .map_err(|e| e.to_string()),
        other => Err(format!(
            "unsupported BIN database '.{}' (build with bin-json, bin-csv or bin-sqlite)",
            other
        )),
    }
}

fn print_bin_info(info: &BinInfo) {
    println!("BIN: {}", info.bin);
    let fields = [
        ("Issuer", info.issuer.clone()),
        ("Type", info.card_type.map(|t| t.to_string())),
        ("Level", info.card_level.map(|l| l.to_string())),
        ("Country", info.country.clone()),
        ("Country Name", info.country_name.clone()),
        ("Network", info.brand.clone()),
        ("Phone", info.bank_phone.clone()),
        ("Website", info.bank_url.clone()),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            println!("{}: {}", name, value);
        }
    }
}

fn cmd_lookup(bin: &str, db: Option<&Path>, config: CheckerConfig, json: bool) {
    let mut session = Session::new(config);
    if let Some(path) = db {
        session = session.with_lookup(load_db(path).unwrap_or_else(|e| fail(e)));
    }

    match session.lookup_bin(bin) {
        Ok(info) if json => print_json(&info),
        Ok(info) => print_bin_info(&info),
        Err(e) => {
            if json {
                print_json(&json!({ "error": e.to_string(), "reason_code": e.code().as_str() }));
            } else {
                println!("Error: {}", e);
            }
            process::exit(1);
        }
    }
}
