//! Display formatting for card numbers.
//!
//! # Format Conventions
//!
//! - **American Express**: `XXXX XXXXXX XXXXX`
//! - **Diners Club** (14 digits): `XXXX XXXXXX XXXX`
//! - **Everything else**, including unrecognized numbers: groups of 4 with
//!   the remainder at the end
//!
//! Formatting only inserts separators, so stripping non-digits from the
//! output gives back the input digits.
//!
//! # Example
//!
//! ```
//! use cc_checker::format::{format_for_display, format_with_separator, strip_non_digits};
//!
//! assert_eq!(format_for_display("4532015112830366"), "4532 0151 1283 0366");
//! assert_eq!(format_for_display("378282246310005"), "3782 822463 10005");
//! assert_eq!(format_with_separator("4532015112830366", "-"), "4532-0151-1283-0366");
//! assert_eq!(strip_non_digits("3782 822463 10005"), "378282246310005");
//! ```

use crate::card::{extract_digits, Network};
use crate::detect::classify_digits;

/// Formats a card number with spaces, grouped for its detected network.
///
/// ```
/// use cc_checker::format::format_for_display;
///
/// assert_eq!(format_for_display("30569309025904"), "3056 930902 5904");
/// assert_eq!(format_for_display("9999999999"), "9999 9999 99");
/// assert_eq!(format_for_display(""), "");
/// ```
pub fn format_for_display(input: &str) -> String {
    format_with_separator(input, " ")
}

/// Formats a card number with a custom separator.
///
/// ```
/// use cc_checker::format::format_with_separator;
///
/// assert_eq!(format_with_separator("4532015112830366", " - "), "4532 - 0151 - 1283 - 0366");
/// ```
pub fn format_with_separator(input: &str, separator: &str) -> String {
    let digits = extract_digits(input);
    let network = classify_digits(&digits).map(|c| c.network);
    join_groups(&digits, &grouping_for(network, digits.len()), separator)
}

/// Formats a card number as if it belonged to `network`.
///
/// ```
/// use cc_checker::format::format_for_network;
/// use cc_checker::Network;
///
/// assert_eq!(format_for_network("123456789012345", Network::Amex), "1234 567890 12345");
/// ```
pub fn format_for_network(input: &str, network: Network) -> String {
    format_for_network_with_separator(input, network, " ")
}

/// Formats a card number for `network` with a custom separator.
pub fn format_for_network_with_separator(input: &str, network: Network, separator: &str) -> String {
    let digits = extract_digits(input);
    join_groups(&digits, &grouping_for(Some(network), digits.len()), separator)
}

/// Group sizes for a network and length.
fn grouping_for(network: Option<Network>, length: usize) -> Vec<usize> {
    match network {
        Some(Network::Amex) => vec![4, 6, 5],
        Some(Network::Diners) if length == 14 => vec![4, 6, 4],
        _ => {
            let mut groups = vec![4; length / 4];
            if length % 4 > 0 {
                groups.push(length % 4);
            }
            groups
        }
    }
}

/// Splits `digits` by `groups`; digits past the last group form one more group.
fn split_digits(digits: &[u8], groups: &[usize]) -> Vec<String> {
    let mut out = Vec::with_capacity(groups.len() + 1);
    let mut pos = 0;
    for &size in groups {
        if pos >= digits.len() {
            break;
        }
        let end = (pos + size).min(digits.len());
        out.push(crate::card::digits_to_string(&digits[pos..end]));
        pos = end;
    }
    if pos < digits.len() {
        out.push(crate::card::digits_to_string(&digits[pos..]));
    }
    out
}

fn join_groups(digits: &[u8], groups: &[usize], separator: &str) -> String {
    split_digits(digits, groups).join(separator)
}

/// Removes every non-digit character.
///
/// ```
/// use cc_checker::format::strip_non_digits;
///
/// assert_eq!(strip_non_digits("4532-0151 1283.0366"), "4532015112830366");
/// ```
pub fn strip_non_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Formats a number as it is typed, always in groups of 4.
///
/// ```
/// use cc_checker::format::format_partial;
///
/// assert_eq!(format_partial("4532"), "4532");
/// assert_eq!(format_partial("45320"), "4532 0");
/// ```
pub fn format_partial(input: &str) -> String {
    let digits = extract_digits(input);
    join_groups(&digits, &grouping_for(None, digits.len()), " ")
}

/// The display groups of a card number.
///
/// ```
/// use cc_checker::format::split_into_groups;
///
/// assert_eq!(split_into_groups("378282246310005"), vec!["3782", "822463", "10005"]);
/// ```
pub fn split_into_groups(input: &str) -> Vec<String> {
    let digits = extract_digits(input);
    let network = classify_digits(&digits).map(|c| c.network);
    split_digits(&digits, &grouping_for(network, digits.len()))
}

/// True if `input` holds only digits, spaces, dashes and periods.
pub fn is_valid_format(input: &str) -> bool {
    input
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_visa_16() {
        assert_eq!(format_for_display("4532015112830366"), "4532 0151 1283 0366");
    }

    #[test]
    fn test_format_visa_13() {
        assert_eq!(format_for_display("4222222222222"), "4222 2222 2222 2");
    }

    #[test]
    fn test_format_amex() {
        assert_eq!(format_for_display("378282246310005"), "3782 822463 10005");
    }

    #[test]
    fn test_format_diners() {
        assert_eq!(format_for_display("30569309025904"), "3056 930902 5904");
        // 16-digit Diners uses plain groups of four.
        assert_eq!(format_for_display("3056930902590400"), "3056 9309 0259 0400");
    }

    #[test]
    fn test_format_amex_overlong_keeps_tail() {
        assert_eq!(format_for_display("3782822463100051"), "3782 822463 10005 1");
    }

    #[test]
    fn test_format_reformats() {
        assert_eq!(format_for_display("4532-0151-1283-0366"), "4532 0151 1283 0366");
        assert_eq!(format_for_display("   "), "");
    }

    #[test]
    fn test_format_19_digit() {
        assert_eq!(format_for_display("4111111111111111111"), "4111 1111 1111 1111 111");
    }

    #[test]
    fn test_unrecognized_uses_fours() {
        assert_eq!(format_for_display("9999999999999995"), "9999 9999 9999 9995");
        assert_eq!(format_for_display("7"), "7");
    }

    #[test]
    fn test_format_round_trip() {
        for input in ["378282246310005", "30569309025904", "6200000000000000", "12"] {
            assert_eq!(strip_non_digits(&format_for_display(input)), input);
        }
    }

    #[test]
    fn test_format_partial() {
        assert_eq!(format_partial("4"), "4");
        assert_eq!(format_partial("4111111111111111"), "4111 1111 1111 1111");
    }

    #[test]
    fn test_split_into_groups() {
        assert_eq!(split_into_groups("4532015112830366"), vec!["4532", "0151", "1283", "0366"]);
        assert!(split_into_groups("").is_empty());
    }

    #[test]
    fn test_is_valid_format() {
        assert!(is_valid_format("4111 1111-1111.1111"));
        assert!(!is_valid_format("4111_1111_1111_1111"));
    }

    #[test]
    fn test_format_for_network_with_separator() {
        assert_eq!(
            format_for_network_with_separator("4532015112830366", Network::Visa, "-"),
            "4532-0151-1283-0366"
        );
    }
}
