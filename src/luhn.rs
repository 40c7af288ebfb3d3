//! Luhn (mod 10) checksum.
//!
//! The slice functions work on digit values (0-9); the `luhn_*` helpers take
//! strings and ignore every non-digit character.

use crate::card::extract_digits;

/// Doubled digit with 9 subtracted when the product exceeds 9.
const DOUBLE_TABLE: [u8; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

/// Validates a digit sequence using the Luhn algorithm.
///
/// Starting at the rightmost digit, every second digit is doubled (minus 9
/// when the result exceeds 9) and the sum must be a multiple of 10. Empty
/// input is invalid.
///
/// # Example
///
/// ```
/// use cc_checker::luhn::validate;
///
/// assert!(validate(&[4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]));
/// assert!(!validate(&[4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2]));
/// assert!(!validate(&[]));
/// ```
#[inline]
pub fn validate(digits: &[u8]) -> bool {
    if digits.is_empty() {
        return false;
    }
    compute_checksum(digits) % 10 == 0
}

/// Computes the Luhn sum (not reduced mod 10) of a full number.
#[inline]
pub fn compute_checksum(digits: &[u8]) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                DOUBLE_TABLE[d as usize] as u32
            } else {
                d as u32
            }
        })
        .sum()
}

/// Computes the check digit to append to `partial`.
///
/// `partial` is the number without its final digit, so its rightmost digit
/// lands in a doubled position once the check digit is appended.
///
/// # Example
///
/// ```
/// use cc_checker::luhn::{generate_check_digit, validate};
///
/// let partial = [4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1];
/// let check = generate_check_digit(&partial);
/// assert_eq!(check, 1);
///
/// let mut full = partial.to_vec();
/// full.push(check);
/// assert!(validate(&full));
/// ```
#[inline]
pub fn generate_check_digit(partial: &[u8]) -> u8 {
    let sum: u32 = partial
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 0 {
                DOUBLE_TABLE[d as usize] as u32
            } else {
                d as u32
            }
        })
        .sum();
    ((10 - (sum % 10)) % 10) as u8
}

/// Luhn-validates the digits of a string, ignoring separators.
///
/// ```
/// use cc_checker::luhn_valid;
///
/// assert!(luhn_valid("4111 1111 1111 1111"));
/// assert!(!luhn_valid("4111 1111 1111 1112"));
/// assert!(!luhn_valid(""));
/// ```
#[inline]
pub fn luhn_valid(input: &str) -> bool {
    validate(&extract_digits(input))
}

/// Check digit for the digits of a partial number string.
///
/// ```
/// use cc_checker::{luhn_check_digit, luhn_valid};
///
/// let partial = "453201511283036";
/// let full = format!("{}{}", partial, luhn_check_digit(partial));
/// assert!(luhn_valid(&full));
/// ```
#[inline]
pub fn luhn_check_digit(partial: &str) -> u8 {
    generate_check_digit(&extract_digits(partial))
}
