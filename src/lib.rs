//! # cc_checker
//!
//! Payment card classification, validation, test-number generation and bulk
//! text parsing.
//!
//! ## Features
//!
//! - Network detection from an ordered BIN catalog (8 networks)
//! - Luhn validation and check digit computation
//! - Validation verdicts with a single reason code, plus a simulated live
//!   check with a weighted score
//! - Test card generation with bank/country metadata
//! - Bulk parsing of pipe- and space-delimited card lists
//! - BIN metadata lookup with a static fallback table
//! - Multiple interfaces: library, CLI, REST API, WASM, Node.js
//!
//! ## Quick Start
//!
//! ```rust
//! use cc_checker::{classify, is_valid, validate, Network, ReasonCode, ValidateOptions, YearMonth};
//!
//! let today = YearMonth::new(2025, 6).unwrap();
//!
//! let verdict = validate("4532 0151 1283 0366", &ValidateOptions::new(), today);
//! assert!(verdict.ok);
//! assert_eq!(verdict.network, Some(Network::Visa));
//!
//! let verdict = validate("4532015112830367", &ValidateOptions::new(), today);
//! assert_eq!(verdict.reason_code, Some(ReasonCode::ChecksumFail));
//!
//! assert_eq!(classify("6011000000000004").unwrap().network, Network::Discover);
//! assert!(is_valid("378282246310005"));
//! ```
//!
//! ## Live Check
//!
//! ```rust
//! use cc_checker::{validate, ReasonCode, ValidateOptions, YearMonth};
//!
//! let today = YearMonth::new(2025, 6).unwrap();
//!
//! let verdict = validate("378282246310005", &ValidateOptions::live("12/27", "1234"), today);
//! assert!(verdict.ok);
//! assert_eq!(verdict.score, Some(120));
//!
//! // Amex needs a four-digit CVV.
//! let verdict = validate("378282246310005", &ValidateOptions::live("12/27", "123"), today);
//! assert_eq!(verdict.reason_code, Some(ReasonCode::BadCvv));
//! ```
//!
//! ## Card Formatting
//!
//! ```rust
//! use cc_checker::format;
//!
//! assert_eq!(format::format_for_display("4532015112830366"), "4532 0151 1283 0366");
//! assert_eq!(format::format_for_display("378282246310005"), "3782 822463 10005");
//! assert_eq!(format::format_for_display("30569309025904"), "3056 930902 5904");
//! ```
//!
//! ## Test Card Generation
//!
//! ```rust
//! use cc_checker::generate::{generate_many, GenerateTarget};
//! use cc_checker::{is_valid, CheckerConfig, YearMonth};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let today = YearMonth::new(2025, 6).unwrap();
//! let cards = generate_many(GenerateTarget::All, 12, &mut rng, today, &CheckerConfig::default());
//!
//! assert_eq!(cards.len(), 12);
//! for card in cards.iter().filter(|c| c.number.is_some()) {
//!     assert!(is_valid(&card.number.as_ref().unwrap().number()));
//! }
//! ```
//!
//! ## Bulk Parsing
//!
//! ```rust
//! use cc_checker::{parse_bulk, YearMonth};
//!
//! let text = "5255 9391 0489 8994 | 05/26 | 244\n5555555555554444 05/26 | 244";
//! let report = parse_bulk(text, YearMonth::new(2025, 6).unwrap());
//!
//! assert_eq!(report.summary().valid, 2);
//! ```
//!
//! ## Supported Networks
//!
//! Networks are matched in this order; the first matching prefix wins.
//!
//! | Network | Prefix | Length | CVV | Luhn |
//! |---------|--------|--------|-----|------|
//! | American Express | 34, 37 | 15 | 4 | yes |
//! | MasterCard | 51-55, 2221-2720 | 16 | 3 | yes |
//! | Visa | 4 | 13, 16, 19 | 3 | yes |
//! | Discover | 6011, 622126-622925, 644-649, 65 | 16 | 3 | yes |
//! | Diners Club | 300-305, 36 | 14, 16 | 3 | yes |
//! | JCB | 3528-3589 | 16 | 3 | yes |
//! | China UnionPay | 62 | 16-19 | 3 | no |
//! | Maestro | 50, 56-58, 6 | 12-19 | 3 | yes |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialize verdicts, generated cards and reports |
//! | `config` | Load `CheckerConfig` from JSON |
//! | `cli` | Command-line tool |
//! | `server` | REST API with Swagger UI |
//! | `wasm` | WebAssembly support |
//! | `parallel` | Rayon-based batch processing |
//! | `bin-json` | JSON BIN database loader |
//! | `bin-csv` | CSV BIN database loader |
//! | `bin-sqlite` | SQLite BIN database |
//!
//! ## Security
//!
//! - Card numbers are stored in fixed-size arrays that are zeroized on drop
//! - `Debug` and `Display` of [`CardNumber`] show masked numbers only
//! - Logs only ever carry masked numbers
//! - Generated numbers are for testing and are not tied to real accounts
//! - No unsafe code (`#![deny(unsafe_code)]`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod batch;
#[path = "bindb/mod.rs"]
pub mod bin;
pub mod bulk;
pub mod card;
pub mod catalog;
pub mod config;
pub mod cvv;
pub mod detect;
pub mod error;
pub mod expiry;
pub mod format;
pub mod generate;
pub mod history;
pub mod luhn;
pub mod mask;
pub mod session;
pub mod stream;
pub mod validate;

#[cfg(feature = "wasm")]
mod wasm;

// Re-export main types at crate root
pub use batch::BatchValidator;
pub use bulk::{parse_bulk, BulkReport};
pub use card::{CardNumber, Network, MAX_CARD_DIGITS};
pub use config::{CheckerConfig, ConfigError};
pub use detect::{classify, classify_bin, BinCheck, Classification};
pub use error::{ReasonCode, Rejection};
pub use expiry::YearMonth;
pub use format::format_for_display;
pub use generate::{generate, GenerateTarget, GeneratedCard};
pub use luhn::{luhn_check_digit, luhn_valid};
pub use session::Session;
pub use validate::{
    check_number, is_valid, validate, validate_with_config, ValidCard, ValidateOptions,
    ValidationVerdict,
};

pub use mask::mask_string;
