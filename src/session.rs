//! Caller-owned checking session.
//!
//! A [`Session`] bundles the configuration, the recent-checks history and an
//! optional BIN metadata service. Nothing here is global: embedders that
//! need concurrent access wrap the session in their own lock.
//!
//! # Example
//!
//! ```
//! use cc_checker::session::Session;
//! use cc_checker::{CheckerConfig, ValidateOptions, YearMonth};
//!
//! let mut session = Session::new(CheckerConfig::default().without_delay());
//! let today = YearMonth::new(2025, 6).unwrap();
//!
//! let verdict = session.check("4532015112830366", &ValidateOptions::live("12/27", "123"), today);
//! assert!(verdict.ok);
//! assert_eq!(session.history().len(), 1);
//! ```

use crate::bin::{BinInfo, BinLookup, FallbackLookup, LookupError, StaticBinTable};
use crate::bulk::{self, BulkReport};
use crate::card::extract_digits;
use crate::config::CheckerConfig;
use crate::detect::classify_digits;
use crate::error::Rejection;
use crate::expiry::YearMonth;
use crate::generate::{self, GenerateTarget, GeneratedCard};
use crate::history::{CheckHistory, CheckRecord};
use crate::validate::{validate_card, ValidateOptions, ValidationVerdict};
use rand::Rng;
use tracing::debug;

/// Configuration, history and BIN lookup for one logical user.
pub struct Session {
    config: CheckerConfig,
    history: CheckHistory,
    lookup: Box<dyn BinLookup>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(CheckerConfig::default())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("history", &self.history.len())
            .field("lookup", &self.lookup.name())
            .finish()
    }
}

impl Session {
    /// Creates a session backed by the static BIN table.
    pub fn new(config: CheckerConfig) -> Self {
        Self {
            history: CheckHistory::new(config.history_capacity),
            config,
            lookup: Box::new(StaticBinTable::new()),
        }
    }

    /// Uses `service` for BIN metadata, falling back to the static table
    /// whenever it fails.
    pub fn with_lookup<L: BinLookup + 'static>(mut self, service: L) -> Self {
        self.lookup = Box::new(FallbackLookup::new(service));
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Recent checks, most recent first.
    pub fn history(&self) -> &CheckHistory {
        &self.history
    }

    /// Forgets every recorded check.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Validates a card, blocking for the configured delay when a live check
    /// is requested, and records the outcome.
    pub fn check(&mut self, input: &str, options: &ValidateOptions, today: YearMonth) -> ValidationVerdict {
        if options.live_check && self.config.live_check_delay_ms > 0 {
            std::thread::sleep(self.config.live_check_delay());
        }
        self.check_now(input, options, today)
    }

    /// Like [`check`](Self::check) without the simulated delay.
    ///
    /// Successful checks are recorded, as are live checks that got as far as
    /// the expiry, CVV or score gates.
    pub fn check_now(&mut self, input: &str, options: &ValidateOptions, today: YearMonth) -> ValidationVerdict {
        let (verdict, reached_live) = self.evaluate(input, options, today);
        if verdict.ok || reached_live {
            self.history.record(CheckRecord::new(input, verdict.clone()));
        } else {
            debug!(reason = ?verdict.reason_code, "check not recorded");
        }
        verdict
    }

    /// Computes a verdict without touching the history. The flag reports
    /// whether the number passed its own checks and the live phase ran.
    pub fn evaluate(&self, input: &str, options: &ValidateOptions, today: YearMonth) -> (ValidationVerdict, bool) {
        let result = validate_card(input, options, today, &self.config);
        let reached_live = options.live_check
            && matches!(
                result,
                Ok(_)
                    | Err(Rejection::BadExpiry(_))
                    | Err(Rejection::BadCvv(_))
                    | Err(Rejection::LiveCheckFail { .. })
            );
        let verdict = match result {
            Ok(card) => ValidationVerdict::from_card(&card),
            Err(rejection) => {
                ValidationVerdict::from_rejection(&rejection, classify_digits(&extract_digits(input)))
            }
        };
        (verdict, reached_live)
    }

    /// Generates one card with this session's configuration.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        target: GenerateTarget,
        rng: &mut R,
        today: YearMonth,
    ) -> GeneratedCard {
        generate::generate(target, rng, today, &self.config)
    }

    /// Generates `count` cards with this session's configuration.
    pub fn generate_many<R: Rng + ?Sized>(
        &self,
        target: GenerateTarget,
        count: usize,
        rng: &mut R,
        today: YearMonth,
    ) -> Vec<GeneratedCard> {
        generate::generate_many(target, count, rng, today, &self.config)
    }

    /// Parses bulk text. Bulk results are not recorded in the history.
    pub fn parse_bulk(&self, text: &str, today: YearMonth) -> BulkReport {
        bulk::parse_bulk(text, today)
    }

    /// Looks up BIN metadata through the configured service.
    pub fn lookup_bin(&self, bin: &str) -> Result<BinInfo, LookupError> {
        self.lookup.lookup(bin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bin::MemoryBinDbBuilder;
    use crate::error::ReasonCode;

    fn today() -> YearMonth {
        YearMonth::new(2025, 6).unwrap()
    }

    fn session() -> Session {
        Session::new(CheckerConfig::default().without_delay())
    }

    #[test]
    fn test_success_recorded() {
        let mut s = session();
        let verdict = s.check("4532015112830366", &ValidateOptions::new(), today());
        assert!(verdict.ok);
        let latest = s.history().latest().unwrap();
        assert_eq!(latest.last_four(), "0366");
        assert!(latest.ok());
    }

    #[test]
    fn test_early_failure_not_recorded() {
        let mut s = session();
        let verdict = s.check("4532015112830367", &ValidateOptions::new(), today());
        assert_eq!(verdict.reason_code, Some(ReasonCode::ChecksumFail));
        assert!(s.history().is_empty());

        // Even with a live check requested, a bad number stops before it.
        s.check("4532015112830367", &ValidateOptions::live("12/27", "123"), today());
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_live_failure_recorded() {
        let mut s = session();
        let verdict = s.check("4532015112830366", &ValidateOptions::live("01/20", "123"), today());
        assert_eq!(verdict.reason_code, Some(ReasonCode::BadExpiry));
        assert_eq!(s.history().len(), 1);
        assert!(!s.history().latest().unwrap().ok());
    }

    #[test]
    fn test_history_capacity_from_config() {
        let mut s = Session::new(CheckerConfig {
            history_capacity: 3,
            ..CheckerConfig::default().without_delay()
        });
        for _ in 0..5 {
            s.check("4532015112830366", &ValidateOptions::new(), today());
        }
        assert_eq!(s.history().len(), 3);
        s.clear_history();
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_lookup_falls_back_to_static_table() {
        let db = MemoryBinDbBuilder::new()
            .add("411111", BinInfo::with_bin("411111").issuer("Test Bank"))
            .build();
        let s = session().with_lookup(db);
        assert_eq!(s.lookup_bin("411111").unwrap().issuer.as_deref(), Some("Test Bank"));
        assert_eq!(s.lookup_bin("453201").unwrap().issuer.as_deref(), Some("HSBC Bank"));
        assert!(s.lookup_bin("12").is_err());
    }

    #[test]
    fn test_default_lookup_is_static() {
        let s = Session::default();
        assert_eq!(s.lookup_bin("601100").unwrap().issuer.as_deref(), Some("Discover"));
        assert!(format!("{:?}", s).contains("static-table"));
    }

    #[test]
    fn test_generate_uses_config() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let s = Session::new(CheckerConfig {
            default_country: "NL".into(),
            ..Default::default()
        });
        let card = s.generate(
            GenerateTarget::Network(crate::Network::Maestro),
            &mut StdRng::seed_from_u64(1),
            today(),
        );
        assert_eq!(card.country_code, "NL");
        assert_eq!(s.generate_many(GenerateTarget::All, 12, &mut StdRng::seed_from_u64(2), today()).len(), 12);
    }

    #[test]
    fn test_bulk_not_recorded() {
        let s = session();
        let report = s.parse_bulk("4111111111111111 | 05/26 | 123", today());
        assert_eq!(report.results.len(), 1);
        assert!(s.history().is_empty());
    }
}
