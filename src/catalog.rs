//! The static network catalog.
//!
//! Each entry lists the anchored BIN prefix patterns of a network, the card
//! lengths it issues and whether its numbers carry a Luhn check digit.
//! Classification walks [`CATALOG`] front to back and stops at the first
//! matching rule, so the entry order resolves overlapping prefixes:
//!
//! | Order | Network | Prefixes | Lengths | Luhn |
//! |-------|---------|----------|---------|------|
//! | 1 | American Express | 34, 37 | 15 | yes |
//! | 2 | MasterCard | 2221-2720, 51-55 | 16 | yes |
//! | 3 | Visa | 4 | 13, 16, 19 | yes |
//! | 4 | Discover | 6011, 622126-622925, 644-649, 65 | 16 | yes |
//! | 5 | Diners Club | 300-305, 36 | 14, 16 | yes |
//! | 6 | JCB | 3528-3589 | 16 | yes |
//! | 7 | China UnionPay | 62 | 16-19 | no |
//! | 8 | Maestro | 50, 56-58, 6 | 12-19 | yes |
//!
//! UnionPay sits ahead of Maestro so that `62` never falls through to
//! Maestro's catch-all `6`.

use crate::card::Network;
use once_cell::sync::Lazy;
use regex::Regex;

/// One BIN prefix rule: an anchored regular expression and the label
/// reported when it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinRule {
    /// Anchored prefix pattern, e.g. `^222[1-9]`.
    pub pattern: &'static str,
    /// Label reported for numbers matching this rule.
    pub label: &'static str,
}

/// Static description of a card network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkSpec {
    /// Network identifier.
    pub network: Network,
    /// Human-readable name.
    pub display_name: &'static str,
    /// Prefix rules, tried in order.
    pub bins: &'static [BinRule],
    /// Accepted total lengths.
    pub valid_lengths: &'static [u8],
    /// Whether the last digit is a Luhn check digit.
    pub uses_checksum: bool,
}

impl NetworkSpec {
    /// Returns true if `length` is one of the accepted lengths.
    #[inline]
    pub fn accepts_length(&self, length: usize) -> bool {
        self.valid_lengths.iter().any(|&l| l as usize == length)
    }
}

const fn rule(pattern: &'static str, label: &'static str) -> BinRule {
    BinRule { pattern, label }
}

const AMEX_BINS: &[BinRule] = &[
    rule("^34", "American Express"),
    rule("^37", "American Express"),
];

const MASTERCARD_BINS: &[BinRule] = &[
    rule("^222[1-9]", "MasterCard"),
    rule("^22[3-9]", "MasterCard"),
    rule("^2[3-6]", "MasterCard"),
    rule("^270[0-9]", "MasterCard"),
    rule("^271[0-9]", "MasterCard"),
    rule("^2720", "MasterCard"),
    rule("^51", "MasterCard"),
    rule("^52", "MasterCard"),
    rule("^53", "MasterCard"),
    rule("^54", "MasterCard"),
    rule("^55", "MasterCard"),
];

const VISA_BINS: &[BinRule] = &[rule("^4", "Visa")];

const DISCOVER_BINS: &[BinRule] = &[
    rule("^6011", "Discover Card"),
    rule("^622(?:12[6-9]|1[3-9]|[2-8]|9[0-1]|9[2-5])", "Discover Card"),
    rule("^64[4-9]", "Discover Card"),
    rule("^65", "Discover Card"),
];

const DINERS_BINS: &[BinRule] = &[
    rule("^300", "Diners Club Carte Blanche"),
    rule("^301", "Diners Club Carte Blanche"),
    rule("^302", "Diners Club Carte Blanche"),
    rule("^303", "Diners Club Carte Blanche"),
    rule("^304", "Diners Club Carte Blanche"),
    rule("^305", "Diners Club Carte Blanche"),
    rule("^36", "Diners Club International"),
];

const JCB_BINS: &[BinRule] = &[
    rule("^352[8-9]", "JCB"),
    rule("^35[3-8]", "JCB"),
    rule("^3589", "JCB"),
];

const UNIONPAY_BINS: &[BinRule] = &[rule("^62", "China UnionPay")];

const MAESTRO_BINS: &[BinRule] = &[
    rule("^50", "Maestro"),
    rule("^56", "Maestro"),
    rule("^57", "Maestro"),
    rule("^58", "Maestro"),
    rule("^6", "Maestro"),
];

/// The catalog, in matching order.
pub static CATALOG: [NetworkSpec; 8] = [
    NetworkSpec {
        network: Network::Amex,
        display_name: "American Express",
        bins: AMEX_BINS,
        valid_lengths: &[15],
        uses_checksum: true,
    },
    NetworkSpec {
        network: Network::Mastercard,
        display_name: "MasterCard",
        bins: MASTERCARD_BINS,
        valid_lengths: &[16],
        uses_checksum: true,
    },
    NetworkSpec {
        network: Network::Visa,
        display_name: "Visa",
        bins: VISA_BINS,
        valid_lengths: &[13, 16, 19],
        uses_checksum: true,
    },
    NetworkSpec {
        network: Network::Discover,
        display_name: "Discover",
        bins: DISCOVER_BINS,
        valid_lengths: &[16],
        uses_checksum: true,
    },
    NetworkSpec {
        network: Network::Diners,
        display_name: "Diners Club",
        bins: DINERS_BINS,
        valid_lengths: &[14, 16],
        uses_checksum: true,
    },
    NetworkSpec {
        network: Network::Jcb,
        display_name: "JCB",
        bins: JCB_BINS,
        valid_lengths: &[16],
        uses_checksum: true,
    },
    NetworkSpec {
        network: Network::UnionPay,
        display_name: "China UnionPay",
        bins: UNIONPAY_BINS,
        valid_lengths: &[16, 17, 18, 19],
        uses_checksum: false,
    },
    NetworkSpec {
        network: Network::Maestro,
        display_name: "Maestro",
        bins: MAESTRO_BINS,
        valid_lengths: &[12, 13, 14, 15, 16, 17, 18, 19],
        uses_checksum: true,
    },
];

/// Compiled form of every rule, indexed like `CATALOG[i].bins[j]`.
static COMPILED: Lazy<Vec<Vec<Regex>>> = Lazy::new(|| {
    CATALOG
        .iter()
        .map(|spec| {
            spec.bins
                .iter()
                .map(|r| Regex::new(r.pattern).expect("catalog BIN patterns are valid regexes"))
                .collect()
        })
        .collect()
});

/// Returns the catalog entry for `network`.
pub fn spec_for(network: Network) -> &'static NetworkSpec {
    let index = match network {
        Network::Amex => 0,
        Network::Mastercard => 1,
        Network::Visa => 2,
        Network::Discover => 3,
        Network::Diners => 4,
        Network::Jcb => 5,
        Network::UnionPay => 6,
        Network::Maestro => 7,
    };
    &CATALOG[index]
}

/// Finds the first catalog rule matching the start of `digits`.
///
/// `digits` must already be a digit-only string.
pub(crate) fn find_rule(digits: &str) -> Option<(&'static NetworkSpec, &'static BinRule)> {
    CATALOG
        .iter()
        .zip(COMPILED.iter())
        .find_map(|(spec, patterns)| {
            spec.bins
                .iter()
                .zip(patterns)
                .find(|(_, re)| re.is_match(digits))
                .map(|(rule, _)| (spec, rule))
        })
}
