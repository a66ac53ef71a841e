//! Lenient numeric prefix parsing.
//!
//! Rule trees were written against a runtime whose integer and float parsing
//! accepts leading whitespace and ignores trailing garbage (`"12abc"` is 12).
//! These helpers reproduce that behaviour so CALC and the typed converters
//! agree with existing device grammars.

/// Parse the longest integer prefix of `text`.
///
/// Accepts leading whitespace, an optional sign, and a `0x`/`0X` hex prefix.
/// Returns `None` when no digit is found or the magnitude does not fit in an
/// `i128`.
pub fn parse_int_prefix(text: &str) -> Option<i128> {
    let bytes = text.trim_start().as_bytes();
    let mut pos = 0;
    let mut negative = false;
    match bytes.first() {
        Some(b'-') => {
            negative = true;
            pos += 1;
        }
        Some(b'+') => pos += 1,
        _ => {}
    }

    let mut radix = 10;
    if bytes.len() >= pos + 2 && bytes[pos] == b'0' && (bytes[pos + 1] == b'x' || bytes[pos + 1] == b'X') {
        radix = 16;
        pos += 2;
    }

    let mut value: i128 = 0;
    let mut digits = 0;
    while let Some(&b) = bytes.get(pos) {
        let digit = match (b as char).to_digit(radix) {
            Some(d) => d as i128,
            None => break,
        };
        value = value.checked_mul(radix as i128)?.checked_add(digit)?;
        digits += 1;
        pos += 1;
    }

    if digits == 0 {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Parse the longest floating point prefix of `text`.
///
/// Accepts leading whitespace, an optional sign, digits with an optional
/// fraction, an optional exponent, or `Infinity`.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut pos = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        pos += 1;
    }

    if trimmed[pos..].starts_with("Infinity") {
        return trimmed[..pos + "Infinity".len()].parse::<f64>().ok();
    }

    let mut mantissa_digits = 0;
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
        mantissa_digits += 1;
    }
    if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
            pos += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    let mut end = pos;
    if matches!(bytes.get(pos), Some(b'e') | Some(b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'-') | Some(b'+')) {
            exp += 1;
        }
        let exp_start = exp;
        while bytes.get(exp).is_some_and(u8::is_ascii_digit) {
            exp += 1;
        }
        if exp > exp_start {
            end = exp;
        }
    }

    trimmed[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_decimal_and_sign() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix("  -17"), Some(-17));
        assert_eq!(parse_int_prefix("+8"), Some(8));
    }

    #[test]
    fn test_int_hex() {
        assert_eq!(parse_int_prefix("0x2a"), Some(42));
        assert_eq!(parse_int_prefix("-0X10"), Some(-16));
    }

    #[test]
    fn test_int_trailing_garbage_ignored() {
        assert_eq!(parse_int_prefix("12abc"), Some(12));
        assert_eq!(parse_int_prefix("1e3"), Some(1));
    }

    #[test]
    fn test_int_no_digits() {
        assert_eq!(parse_int_prefix("NaN"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix("0x"), None);
    }

    #[test]
    fn test_float_forms() {
        assert_eq!(parse_float_prefix("3.25"), Some(3.25));
        assert_eq!(parse_float_prefix(" -1e3xyz"), Some(-1000.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("7."), Some(7.0));
        assert_eq!(parse_float_prefix("2e"), Some(2.0));
        assert_eq!(parse_float_prefix("Infinity"), Some(f64::INFINITY));
    }

    #[test]
    fn test_float_rejects_non_numbers() {
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix("."), None);
    }
}
