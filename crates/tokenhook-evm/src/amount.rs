//! Conversion between human-readable amounts and token base units.

use alloy::primitives::U256;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from amount conversion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount must not be negative: {0}")]
    Negative(Decimal),
    #[error("too many decimal places: got {got}, max {max}")]
    TooPrecise { got: u32, max: u8 },
    #[error("invalid amount: {0}")]
    Invalid(String),
}

/// Scales a decimal amount (e.g. `1.5`) to base units.
///
/// `parse_units(1.5, 18)` → `1_500_000_000_000_000_000`.
pub fn parse_units(amount: Decimal, decimals: u8) -> Result<U256, AmountError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AmountError::Negative(amount));
    }
    let amount = amount.normalize();
    if amount.scale() > u32::from(decimals) {
        return Err(AmountError::TooPrecise {
            got: amount.scale(),
            max: decimals,
        });
    }

    let repr = amount.abs().to_string();
    let (integer, fractional) = match repr.split_once('.') {
        Some((i, f)) => (i, f),
        None => (repr.as_str(), ""),
    };

    // Pad fractional part to `decimals` digits
    let padded = format!("{fractional:0<width$}", width = decimals as usize);
    let combined = format!("{integer}{padded}");

    // Strip leading zeros (but keep at least "0")
    let combined = combined.trim_start_matches('0');
    let combined = if combined.is_empty() { "0" } else { combined };

    U256::from_str_radix(combined, 10).map_err(|e| AmountError::Invalid(e.to_string()))
}

/// Formats base units as a decimal string with the given number of decimals.
pub fn format_units(value: U256, decimals: u8) -> String {
    let s = value.to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return s;
    }

    if s.len() <= decimals {
        if value.is_zero() {
            return "0.0".to_string();
        }
        let zeros = decimals - s.len();
        let mut result = "0.".to_string();
        result.push_str(&"0".repeat(zeros));
        result.push_str(s.trim_end_matches('0'));
        result
    } else {
        let integer_part = &s[..s.len() - decimals];
        let fractional = s[s.len() - decimals..].trim_end_matches('0');
        if fractional.is_empty() {
            format!("{integer_part}.0")
        } else {
            format!("{integer_part}.{fractional}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn parse_units_no_decimal() {
        let result = parse_units(dec("100"), 18).unwrap();
        assert_eq!(
            result,
            U256::from(100u64) * U256::from(10u64).pow(U256::from(18u64))
        );
    }

    #[test]
    fn parse_units_usdc_six_decimals() {
        let result = parse_units(dec("1000.0"), 6).unwrap();
        assert_eq!(result, U256::from(1_000_000_000u64));
    }

    #[test]
    fn parse_units_small_fraction() {
        let result = parse_units(dec("0.000001"), 18).unwrap();
        assert_eq!(result, U256::from(1_000_000_000_000u64));
    }

    #[test]
    fn parse_units_trailing_zeros_do_not_count() {
        let result = parse_units(dec("1.500000000"), 6).unwrap();
        assert_eq!(result, U256::from(1_500_000u64));
    }

    #[test]
    fn parse_units_too_many_decimals() {
        let result = parse_units(dec("1.1234567"), 6);
        assert_eq!(result, Err(AmountError::TooPrecise { got: 7, max: 6 }));
    }

    #[test]
    fn parse_units_negative() {
        assert!(matches!(
            parse_units(dec("-1"), 18),
            Err(AmountError::Negative(_))
        ));
    }

    #[test]
    fn parse_units_zero_decimals() {
        assert_eq!(parse_units(dec("42"), 0).unwrap(), U256::from(42u64));
        assert!(parse_units(dec("4.2"), 0).is_err());
    }

    #[test]
    fn format_units_values() {
        assert_eq!(format_units(U256::from(1_500_000u64), 6), "1.5");
        assert_eq!(format_units(U256::from(1u64), 6), "0.000001");
        assert_eq!(format_units(U256::from(2_000_000u64), 6), "2.0");
        assert_eq!(format_units(U256::ZERO, 18), "0.0");
        assert_eq!(format_units(U256::from(7u64), 0), "7");
    }

    #[test]
    fn parse_units_roundtrip_with_format_units() {
        let base = parse_units(dec("1.5"), 18).unwrap();
        assert_eq!(format_units(base, 18), "1.5");
    }
}
