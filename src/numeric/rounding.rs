// ============================================================================
// Rounding Modes
// Shared rounding rules for decimals and big-integer quotients
// ============================================================================

use super::errors::{NumericError, NumericResult};
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest scale a `rust_decimal::Decimal` can carry.
pub const MAX_DECIMAL_SCALE: u32 = 28;

/// How to discard digits when a value must be shortened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoundingMode {
    /// Away from zero
    Up,
    /// Toward zero (truncation)
    Down,
    /// Toward positive infinity
    Ceiling,
    /// Toward negative infinity
    Floor,
    /// Nearest neighbour, ties away from zero
    #[default]
    HalfUp,
    /// Nearest neighbour, ties toward zero
    HalfDown,
    /// Nearest neighbour, ties to the even neighbour
    HalfEven,
    /// No rounding allowed; any discarded digit is an error
    Unnecessary,
}

impl RoundingMode {
    fn strategy(self) -> Option<RoundingStrategy> {
        match self {
            RoundingMode::Up => Some(RoundingStrategy::AwayFromZero),
            RoundingMode::Down => Some(RoundingStrategy::ToZero),
            RoundingMode::Ceiling => Some(RoundingStrategy::ToPositiveInfinity),
            RoundingMode::Floor => Some(RoundingStrategy::ToNegativeInfinity),
            RoundingMode::HalfUp => Some(RoundingStrategy::MidpointAwayFromZero),
            RoundingMode::HalfDown => Some(RoundingStrategy::MidpointTowardZero),
            RoundingMode::HalfEven => Some(RoundingStrategy::MidpointNearestEven),
            RoundingMode::Unnecessary => None,
        }
    }

    /// Round `value` to `scale` fractional digits.
    ///
    /// The result always carries exactly `scale` fractional digits, padding
    /// with zeros when the input is shorter.
    ///
    /// # Errors
    /// - `PrecisionLoss` for `Unnecessary` when digits would be discarded
    /// - `Overflow` if `scale` exceeds the decimal range
    pub fn round_decimal(self, value: Decimal, scale: u32) -> NumericResult<Decimal> {
        if scale > MAX_DECIMAL_SCALE {
            return Err(NumericError::Overflow);
        }
        let mut rounded = match self.strategy() {
            Some(strategy) => value.round_dp_with_strategy(scale, strategy),
            None => {
                let truncated = value.round_dp_with_strategy(scale, RoundingStrategy::ToZero);
                if truncated != value {
                    return Err(NumericError::PrecisionLoss {
                        value: value.to_string(),
                        rounded: truncated.to_string(),
                    });
                }
                truncated
            },
        };
        if rounded.scale() < scale {
            rounded.rescale(scale);
        }
        Ok(rounded)
    }

    /// Divide `numerator` by `denominator` and round the quotient to an
    /// integer.
    ///
    /// # Errors
    /// - `DivisionByZero` if `denominator` is zero
    /// - `PrecisionLoss` for `Unnecessary` with a non-zero remainder
    pub fn div_round(self, numerator: &BigInt, denominator: &BigInt) -> NumericResult<BigInt> {
        if denominator.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        let (quotient, remainder) = numerator.div_rem(denominator);
        if remainder.is_zero() {
            return Ok(quotient);
        }

        let positive = numerator.sign() == denominator.sign() || numerator.sign() == Sign::NoSign;
        let away = match self {
            RoundingMode::Up => true,
            RoundingMode::Down => false,
            RoundingMode::Ceiling => positive,
            RoundingMode::Floor => !positive,
            RoundingMode::HalfUp | RoundingMode::HalfDown | RoundingMode::HalfEven => {
                let twice: BigInt = remainder.abs() * 2;
                match twice.cmp(&denominator.abs()) {
                    Ordering::Greater => true,
                    Ordering::Less => false,
                    Ordering::Equal => match self {
                        RoundingMode::HalfUp => true,
                        RoundingMode::HalfDown => false,
                        _ => quotient.is_odd(),
                    },
                }
            },
            RoundingMode::Unnecessary => {
                return Err(NumericError::PrecisionLoss {
                    value: format!("{}/{}", numerator, denominator),
                    rounded: quotient.to_string(),
                })
            },
        };

        if !away {
            Ok(quotient)
        } else if positive {
            Ok(quotient + BigInt::one())
        } else {
            Ok(quotient - BigInt::one())
        }
    }
}
