//! Masking for logs and history display.
//!
//! Only the last four digits are ever shown by [`mask_digits`] and
//! [`mask_string`]; [`mask_with_bin`] also exposes the leading six.
//! Never log or print a full card number.

/// Masks digit values, keeping the last four.
///
/// Format: `****-****-****-1234`
///
/// # Example
///
/// ```
/// use cc_checker::CardNumber;
///
/// let card = CardNumber::parse("4111-1111-1111-1111").unwrap();
/// assert_eq!(card.masked(), "****-****-****-1111");
/// ```
pub fn mask_digits(digits: &[u8]) -> String {
    let len = digits.len();
    if len <= 4 {
        return "*".repeat(len);
    }

    let masked_count = len - 4;
    let mut result = String::with_capacity(len + len / 4);
    for i in 0..masked_count {
        if i > 0 && i % 4 == 0 {
            result.push('-');
        }
        result.push('*');
    }
    if masked_count % 4 == 0 {
        result.push('-');
    }
    for &d in &digits[masked_count..] {
        result.push((b'0' + d) as char);
    }
    result
}

/// Masks digit values, keeping the BIN (first 6) and the last four.
///
/// Format: `411111******1234`. Numbers of ten digits or fewer fall back to
/// [`mask_digits`].
///
/// ```
/// use cc_checker::mask::mask_with_bin;
///
/// assert_eq!(mask_with_bin(&[4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]), "411111******1111");
/// ```
pub fn mask_with_bin(digits: &[u8]) -> String {
    let len = digits.len();
    if len <= 10 {
        return mask_digits(digits);
    }

    let mut result = String::with_capacity(len);
    for &d in &digits[..6] {
        result.push((b'0' + d) as char);
    }
    result.extend(std::iter::repeat('*').take(len - 10));
    for &d in &digits[len - 4..] {
        result.push((b'0' + d) as char);
    }
    result
}

/// Masks raw input after stripping non-digits.
#[inline]
pub fn mask_string(input: &str) -> String {
    mask_digits(&crate::card::extract_digits(input))
}

/// The last four digits of raw input, or an empty string for fewer than four.
pub fn last_four_from_string(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(char::is_ascii_digit).collect();
    if digits.len() >= 4 {
        digits[digits.len() - 4..].iter().collect()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_16_digits() {
        assert_eq!(
            mask_digits(&[4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]),
            "****-****-****-1111"
        );
    }

    #[test]
    fn test_mask_15_digits() {
        let masked = mask_digits(&[3, 7, 8, 2, 8, 2, 2, 4, 6, 3, 1, 0, 0, 0, 5]);
        assert_eq!(masked, "****-****-***0005");
    }

    #[test]
    fn test_mask_short() {
        assert_eq!(mask_digits(&[1, 2, 3]), "***");
        assert_eq!(mask_digits(&[]), "");
    }

    #[test]
    fn test_mask_with_bin() {
        assert_eq!(
            mask_with_bin(&[4, 5, 3, 2, 0, 1, 5, 1, 1, 2, 8, 3, 0, 3, 6, 6]),
            "453201******0366"
        );
        assert_eq!(mask_with_bin(&[1, 2, 3, 4, 5]), "*2345");
    }

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string("4111 1111 1111 1111"), "****-****-****-1111");
        assert_eq!(mask_string("4111-1111-1111-1111"), "****-****-****-1111");
    }

    #[test]
    fn test_last_four_from_string() {
        assert_eq!(last_four_from_string("4111-1111-1111-1234"), "1234");
        assert_eq!(last_four_from_string("123"), "");
    }
}
