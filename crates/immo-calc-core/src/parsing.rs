//! Lenient numeric parsing for user-entered fields.
//!
//! Form fields and stored records deliver numbers as JSON numbers, numeric
//! strings, free text, empty strings or not at all. Every calculator reads
//! its inputs through [`parse_number`], which maps anything unusable to zero
//! and never fails.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest exponent magnitude a `Decimal` can represent.
const MAX_EXPONENT: u32 = 28;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A numeric field exactly as it arrived from the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    /// A JSON number, or a string that is a plain decimal literal
    Number(Decimal),
    /// Any other text; its leading numeric portion is used
    Text(String),
    /// Booleans, arrays, objects, out-of-range numbers
    Other(serde_json::Value),
}

impl RawNumber {
    /// The numeric value, or `None` when nothing numeric can be read.
    pub fn try_value(&self) -> Option<Decimal> {
        match self {
            RawNumber::Number(d) => Some(*d),
            RawNumber::Text(s) => try_parse_text(s),
            RawNumber::Other(v) => v.as_f64().and_then(Decimal::from_f64),
        }
    }

    /// True for an empty (or whitespace-only) string.
    pub fn is_blank(&self) -> bool {
        matches!(self, RawNumber::Text(s) if s.trim().is_empty())
    }
}

impl From<Decimal> for RawNumber {
    fn from(value: Decimal) -> Self {
        RawNumber::Number(value)
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Read a raw field as a number; absent, blank or non-numeric input yields 0.
pub fn parse_number(value: Option<&RawNumber>) -> Decimal {
    value.and_then(RawNumber::try_value).unwrap_or(Decimal::ZERO)
}

/// Parse the leading numeric portion of `text`, or 0.
///
/// `"12.5"` → 12.5, `" 7abc"` → 7, `"1e3"` → 1000, `"abc"` → 0.
pub fn parse_text(text: &str) -> Decimal {
    try_parse_text(text).unwrap_or(Decimal::ZERO)
}

/// Parse the leading numeric portion of `text`.
///
/// Leading whitespace is skipped, the decimal separator is always `.`, and
/// an exponent is only consumed when digits follow it. Returns `None` when
/// no digits precede the first unrecognised character or the value does not
/// fit a `Decimal`.
pub fn try_parse_text(text: &str) -> Option<Decimal> {
    let bytes = text.trim_start().as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &bytes[int_start..pos];

    let mut frac_digits: &[u8] = &[];
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        frac_digits = &bytes[frac_start..end];
        pos = end;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut exponent: Option<&[u8]> = None;
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut end = pos + 1;
        if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
            end += 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > digits_start {
            exponent = Some(&bytes[pos + 1..end]);
        }
    }

    // Only ASCII digits, signs and '.' were collected above.
    let ascii = |b: &[u8]| String::from_utf8_lossy(b).into_owned();
    let mut literal = String::new();
    if negative {
        literal.push('-');
    }
    if int_digits.is_empty() {
        literal.push('0');
    } else {
        literal.push_str(&ascii(int_digits));
    }
    if !frac_digits.is_empty() {
        literal.push('.');
        literal.push_str(&ascii(frac_digits));
    }

    let mantissa = Decimal::from_str(&literal).ok()?;
    match exponent {
        Some(exp) => scale_by_power_of_ten(mantissa, ascii(exp).parse().ok()?),
        None => Some(mantissa),
    }
}

fn scale_by_power_of_ten(mantissa: Decimal, exp: i32) -> Option<Decimal> {
    if exp.unsigned_abs() > MAX_EXPONENT {
        return None;
    }
    let mut factor = Decimal::ONE;
    for _ in 0..exp.unsigned_abs() {
        factor = factor.checked_mul(Decimal::TEN)?;
    }
    if exp >= 0 {
        mantissa.checked_mul(factor)
    } else {
        mantissa.checked_div(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_number_passes_through() {
        let raw = RawNumber::Number(dec!(480000));
        assert_eq!(parse_number(Some(&raw)), dec!(480000));
    }

    #[test]
    fn test_missing_and_empty_are_zero() {
        assert_eq!(parse_number(None), Decimal::ZERO);
        assert_eq!(parse_number(Some(&RawNumber::from(""))), Decimal::ZERO);
        assert_eq!(parse_number(Some(&RawNumber::from("   "))), Decimal::ZERO);
    }

    #[test]
    fn test_leading_numeric_portion() {
        assert_eq!(parse_text("12.5"), dec!(12.5));
        assert_eq!(parse_text("  7abc"), dec!(7));
        assert_eq!(parse_text("3.5%"), dec!(3.5));
        assert_eq!(parse_text("-10%"), dec!(-10));
        assert_eq!(parse_text("+2"), dec!(2));
        assert_eq!(parse_text(".5"), dec!(0.5));
        assert_eq!(parse_text("12."), dec!(12));
        assert_eq!(parse_text("1,5"), dec!(1));
    }

    #[test]
    fn test_exponent_only_with_digits() {
        assert_eq!(parse_text("1e3"), dec!(1000));
        assert_eq!(parse_text("2.5E-1"), dec!(0.25));
        assert_eq!(parse_text("4e"), dec!(4));
        assert_eq!(parse_text("4e+x"), dec!(4));
    }

    #[test]
    fn test_unparseable_is_zero() {
        assert_eq!(parse_text("abc"), Decimal::ZERO);
        assert_eq!(parse_text("-"), Decimal::ZERO);
        assert_eq!(parse_text("."), Decimal::ZERO);
        assert_eq!(parse_text("Infinity"), Decimal::ZERO);
        assert_eq!(parse_text("1e400"), Decimal::ZERO);
    }

    #[test]
    fn test_other_json_values() {
        assert_eq!(
            parse_number(Some(&RawNumber::Other(serde_json::json!(true)))),
            Decimal::ZERO
        );
        assert_eq!(
            parse_number(Some(&RawNumber::Other(serde_json::json!([1, 2])))),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_deserialize_mixed_shapes() {
        let values: Vec<RawNumber> =
            serde_json::from_str(r#"[250000, "36000", "", "12 CHF", false]"#).unwrap();
        let parsed: Vec<Decimal> = values.iter().map(|v| parse_number(Some(v))).collect();
        assert_eq!(
            parsed,
            vec![dec!(250000), dec!(36000), dec!(0), dec!(12), dec!(0)]
        );
        assert!(values[2].is_blank());
        assert!(!values[0].is_blank());
    }
}
