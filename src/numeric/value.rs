// ============================================================================
// Numeric Value
// Common conversions and ordering for every exact value type
// ============================================================================

use super::errors::{NumericError, NumericResult};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::str::FromStr;

/// Behaviour shared by packed decimals, fractions and money amounts.
///
/// Every value projects onto a canonical `Decimal`; the native-width
/// conversions and the value ordering are defined through that projection.
/// Integer conversions truncate toward zero.
pub trait NumericValue {
    /// Canonical exact decimal projection of the value.
    fn to_decimal(&self) -> NumericResult<Decimal>;

    fn to_i128(&self) -> NumericResult<i128> {
        ToPrimitive::to_i128(&self.to_decimal()?.trunc()).ok_or(NumericError::Overflow)
    }

    fn to_i64(&self) -> NumericResult<i64> {
        i64::try_from(self.to_i128()?).map_err(|_| NumericError::Overflow)
    }

    fn to_i32(&self) -> NumericResult<i32> {
        i32::try_from(self.to_i128()?).map_err(|_| NumericError::Overflow)
    }

    fn to_u64(&self) -> NumericResult<u64> {
        u64::try_from(self.to_i128()?).map_err(|_| NumericError::Overflow)
    }

    fn to_f64(&self) -> NumericResult<f64> {
        ToPrimitive::to_f64(&self.to_decimal()?).ok_or(NumericError::Overflow)
    }

    /// Total ordering by decimal projection.
    fn cmp_value(&self, other: &dyn NumericValue) -> NumericResult<Ordering> {
        Ok(self.to_decimal()?.cmp(&other.to_decimal()?))
    }
}

impl NumericValue for Decimal {
    fn to_decimal(&self) -> NumericResult<Decimal> {
        Ok(*self)
    }
}

/// Conversion of operand values into an exact decimal.
///
/// Accepts integers, decimals, decimal strings and the crate's own value
/// types, so arithmetic entry points can take any of them.
pub trait IntoDecimal {
    fn into_decimal(self) -> NumericResult<Decimal>;
}

impl IntoDecimal for Decimal {
    fn into_decimal(self) -> NumericResult<Decimal> {
        Ok(self)
    }
}

impl IntoDecimal for &Decimal {
    fn into_decimal(self) -> NumericResult<Decimal> {
        Ok(*self)
    }
}

macro_rules! into_decimal_from_int {
    ($($t:ty),*) => {
        $(
            impl IntoDecimal for $t {
                fn into_decimal(self) -> NumericResult<Decimal> {
                    Ok(Decimal::from(self))
                }
            }
        )*
    };
}

into_decimal_from_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl IntoDecimal for i128 {
    fn into_decimal(self) -> NumericResult<Decimal> {
        Decimal::from_i128(self).ok_or(NumericError::Overflow)
    }
}

impl IntoDecimal for &str {
    fn into_decimal(self) -> NumericResult<Decimal> {
        parse_decimal(self)
    }
}

impl IntoDecimal for &String {
    fn into_decimal(self) -> NumericResult<Decimal> {
        parse_decimal(self)
    }
}

impl IntoDecimal for String {
    fn into_decimal(self) -> NumericResult<Decimal> {
        parse_decimal(&self)
    }
}

/// Parse a plain decimal literal (`[+-]digits[.digits]`).
pub(crate) fn parse_decimal(text: &str) -> NumericResult<Decimal> {
    let trimmed = text.trim();
    if !is_decimal_literal(trimmed, &['.']) {
        return Err(NumericError::parse(text, "not a decimal number"));
    }
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let normalized = match body.strip_prefix('.') {
        Some(frac) => format!("{}0.{}", if negative { "-" } else { "" }, frac),
        None => format!("{}{}", if negative { "-" } else { "" }, body),
    };
    Decimal::from_str(&normalized).map_err(|e| NumericError::parse(text, e.to_string()))
}

/// Syntax check for `[+-]digits[<sep>digits]`, also accepting `<sep>digits`.
pub(crate) fn is_decimal_literal(text: &str, separators: &[char]) -> bool {
    let body = text
        .strip_prefix('+')
        .or_else(|| text.strip_prefix('-'))
        .unwrap_or(text);
    let (int_part, frac_part) = match body.find(|c| separators.contains(&c)) {
        Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
        None => (body, None),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    match frac_part {
        None => !int_part.is_empty() && all_digits(int_part),
        Some(frac) => !frac.is_empty() && all_digits(int_part) && all_digits(frac),
    }
}

/// Number of significant digits in the decimal's mantissa (zero has one).
pub(crate) fn digit_count(value: &Decimal) -> u32 {
    let mut mantissa = value.mantissa().unsigned_abs();
    let mut digits = 1;
    while mantissa >= 10 {
        mantissa /= 10;
        digits += 1;
    }
    digits
}
