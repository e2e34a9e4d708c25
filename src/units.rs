//! Single parsing boundary between chain/UI strings and pricing numbers.
//!
//! Chain reads arrive as wei integer strings and user input as decimal text.
//! Wei strings are parsed as exact uint256 values. Everything that enters the
//! pricer as a number goes through here and fails with a [`ParseError`]
//! instead of being coerced to zero.

use crate::error::ParseError;
use alloy_primitives::utils::format_units;
use alloy_primitives::U256;

/// Decimals of the native currency and of launchpad tokens.
pub const WEI_DECIMALS: u8 = 18;

/// Parses a non-negative, finite decimal such as `"0.25"` or `"1e3"`.
pub fn parse_decimal(input: &str) -> Result<f64, ParseError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ParseError::Empty);
    }
    let v: f64 = s.parse().map_err(|_| ParseError::Invalid(s.to_string()))?;
    if !v.is_finite() {
        return Err(ParseError::NonFinite(s.to_string()));
    }
    if v < 0.0 {
        return Err(ParseError::Negative(s.to_string()));
    }
    Ok(v)
}

/// Parses a base-unit integer string (e.g. wei) as a uint256 and scales it by `decimals`.
///
/// The integer is exact up to 2^256 - 1; precision is only lost in the final
/// conversion to `f64`.
pub fn parse_units(input: &str, decimals: u8) -> Result<f64, ParseError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ParseError::Empty);
    }
    if s.starts_with('-') {
        return Err(ParseError::Negative(s.to_string()));
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::Invalid(s.to_string()));
    }
    let raw = U256::from_str_radix(s, 10).map_err(|_| ParseError::Overflow(s.to_string()))?;
    let text = format_units(raw, decimals).map_err(|_| ParseError::Invalid(s.to_string()))?;
    let v: f64 = text.parse().map_err(|_| ParseError::Invalid(s.to_string()))?;
    if !v.is_finite() {
        return Err(ParseError::NonFinite(s.to_string()));
    }
    Ok(v)
}

/// Parses an 18-decimal wei string into whole units.
pub fn parse_wei(input: &str) -> Result<f64, ParseError> {
    parse_units(input, WEI_DECIMALS)
}

/// Replaces NaN, infinities and negatives with `0.0`.
///
/// Used by the pricing functions, which never fail on bad numbers.
#[inline]
pub fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_accepts_plain_and_exponent_forms() {
        assert_eq!(parse_decimal(" 0.25 "), Ok(0.25));
        assert_eq!(parse_decimal("1e3"), Ok(1000.0));
        assert_eq!(parse_decimal("0"), Ok(0.0));
    }

    #[test]
    fn decimal_rejects_garbage() {
        assert_eq!(parse_decimal(""), Err(ParseError::Empty));
        assert_eq!(parse_decimal("   "), Err(ParseError::Empty));
        assert_eq!(parse_decimal("abc"), Err(ParseError::Invalid("abc".into())));
        assert_eq!(parse_decimal("NaN"), Err(ParseError::NonFinite("NaN".into())));
        assert_eq!(parse_decimal("inf"), Err(ParseError::NonFinite("inf".into())));
        assert_eq!(parse_decimal("-1.5"), Err(ParseError::Negative("-1.5".into())));
    }

    #[test]
    fn wei_scales_by_eighteen_decimals() {
        assert_eq!(parse_wei("1000000000000000000"), Ok(1.0));
        assert_eq!(parse_wei("0"), Ok(0.0));
        let v = parse_wei("2500000000000000").unwrap();
        assert!((v - 0.0025).abs() < 1e-18);
        // larger than u128::MAX
        let huge = parse_wei("1000000000000000000000000000000000000000000").unwrap();
        assert!((huge - 1e24).abs() / 1e24 < 1e-12);
    }

    #[test]
    fn wei_is_bounded_by_uint256() {
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        let two_pow_256 = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        let v = parse_wei(max).unwrap();
        assert!((v - 1.157920892373162e59).abs() / v < 1e-12);
        assert_eq!(parse_wei(two_pow_256), Err(ParseError::Overflow(two_pow_256.into())));
        let too_long = format!("1{}", "0".repeat(80));
        assert_eq!(parse_wei(&too_long), Err(ParseError::Overflow(too_long.clone())));
    }

    #[test]
    fn units_honour_decimals() {
        assert_eq!(parse_units("1500000", 6), Ok(1.5));
        assert_eq!(parse_units("42", 0), Ok(42.0));
    }

    #[test]
    fn wei_rejects_decimals_and_signs() {
        assert_eq!(parse_wei("1.5"), Err(ParseError::Invalid("1.5".into())));
        assert_eq!(parse_wei("+1"), Err(ParseError::Invalid("+1".into())));
        assert_eq!(parse_wei("-1"), Err(ParseError::Negative("-1".into())));
        assert_eq!(parse_wei(""), Err(ParseError::Empty));
    }

    #[test]
    fn sanitize_floors_bad_values() {
        assert_eq!(sanitize(f64::NAN), 0.0);
        assert_eq!(sanitize(f64::INFINITY), 0.0);
        assert_eq!(sanitize(-3.0), 0.0);
        assert_eq!(sanitize(2.0), 2.0);
    }
}
