//! Primary lookup with a static-table fallback.

use super::{bin_digits, BinInfo, BinLookup, LookupError, StaticBinTable};
use tracing::{debug, warn};

/// Tries a primary [`BinLookup`] once and answers from the
/// [`StaticBinTable`] when it fails.
///
/// Malformed BINs are rejected without consulting either source. When
/// both sources fail, the primary's error is returned.
pub struct FallbackLookup<P> {
    primary: P,
    fallback: StaticBinTable,
}

impl<P: BinLookup> FallbackLookup<P> {
    /// Wraps `primary`.
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            fallback: StaticBinTable::new(),
        }
    }

    /// The wrapped service.
    pub fn primary(&self) -> &P {
        &self.primary
    }
}

impl<P: BinLookup> BinLookup for FallbackLookup<P> {
    fn lookup(&self, bin: &str) -> Result<BinInfo, LookupError> {
        bin_digits(bin)?;
        let err = match self.primary.lookup(bin) {
            Ok(info) => return Ok(info),
            Err(err) => err,
        };

        match &err {
            LookupError::NotFound(_) => debug!(service = self.primary.name(), "BIN not found, using static table"),
            _ => warn!(service = self.primary.name(), error = %err, "BIN lookup failed, using static table"),
        }

        self.fallback.lookup(bin).map_err(|_| err)
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bin::MemoryBinDbBuilder;

    struct Offline;

    impl BinLookup for Offline {
        fn lookup(&self, _bin: &str) -> Result<BinInfo, LookupError> {
            Err(LookupError::Transport("connection refused".into()))
        }
    }

    #[test]
    fn test_primary_answer_wins() {
        let db = MemoryBinDbBuilder::new()
            .add("453201", BinInfo::with_bin("453201").issuer("Primary Bank"))
            .build();
        let lookup = FallbackLookup::new(db);
        assert_eq!(
            lookup.lookup("453201").unwrap().issuer.as_deref(),
            Some("Primary Bank")
        );
    }

    #[test]
    fn test_transport_error_degrades() {
        let lookup = FallbackLookup::new(Offline);
        let info = lookup.lookup("545600").unwrap();
        assert_eq!(info.issuer.as_deref(), Some("Wells Fargo"));
    }

    #[test]
    fn test_both_fail_returns_primary_error() {
        let lookup = FallbackLookup::new(Offline);
        assert_eq!(
            lookup.lookup("999999"),
            Err(LookupError::Transport("connection refused".into()))
        );
    }

    #[test]
    fn test_invalid_bin_not_retried() {
        let lookup = FallbackLookup::new(Offline);
        assert!(matches!(lookup.lookup("12"), Err(LookupError::InvalidBin(_))));
    }
}
