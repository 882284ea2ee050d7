// ============================================================================
// Numeric Context
// Precision, maximum scale and rounding mode for monetary values
// ============================================================================

use crate::numeric::{digit_count, NumericError, NumericResult, RoundingMode, MAX_DECIMAL_SCALE};
use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Immutable description of how far a monetary value may grow.
///
/// - `precision`: maximum number of significant digits, `0` = unlimited
/// - `max_scale`: maximum number of fractional digits, `-1` = unlimited
/// - `rounding`: how digits beyond either bound are discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NumericContext {
    precision: u32,
    max_scale: i32,
    rounding: RoundingMode,
}

impl NumericContext {
    /// Everyday context: 28 significant digits, 4 fractional digits, HALF_UP.
    pub const DEFAULT: Self = Self::new(28, 4, RoundingMode::HalfUp);

    /// Unbounded context for capability queries; not meant for arithmetic.
    pub const MAXIMAL: Self = Self::new(0, -1, RoundingMode::HalfUp);

    pub const fn new(precision: u32, max_scale: i32, rounding: RoundingMode) -> Self {
        Self {
            precision,
            max_scale,
            rounding,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub const fn precision(&self) -> u32 {
        self.precision
    }

    pub const fn max_scale(&self) -> i32 {
        self.max_scale
    }

    pub const fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    pub const fn has_unlimited_precision(&self) -> bool {
        self.precision == 0
    }

    pub const fn has_unlimited_scale(&self) -> bool {
        self.max_scale < 0
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    pub const fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub const fn with_max_scale(mut self, max_scale: i32) -> Self {
        self.max_scale = max_scale;
        self
    }

    pub const fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    /// Validate the context
    pub fn validate(&self) -> Result<(), String> {
        if self.max_scale < -1 {
            return Err("Max scale must be -1 (unlimited) or non-negative".to_string());
        }
        if self.max_scale > MAX_DECIMAL_SCALE as i32 {
            return Err(format!("Max scale cannot exceed {}", MAX_DECIMAL_SCALE));
        }
        if self.precision > MAX_DECIMAL_SCALE + 1 {
            return Err(format!("Precision cannot exceed {}", MAX_DECIMAL_SCALE + 1));
        }
        Ok(())
    }

    /// Widen the bounds just enough to hold `value` unrounded.
    ///
    /// Unlimited bounds stay unlimited.
    pub fn widened_for(&self, value: &Decimal) -> Self {
        let mut widened = *self;
        if !self.has_unlimited_scale() && value.scale() as i32 > self.max_scale {
            widened.max_scale = value.scale() as i32;
        }
        if !self.has_unlimited_precision() {
            widened.precision = self.precision.max(digit_count(value));
        }
        widened
    }

    // ========================================================================
    // Rounding
    // ========================================================================

    /// Round `value` into this context: first to `max_scale` fractional
    /// digits, then to `precision` significant digits.
    ///
    /// # Errors
    /// - `Overflow` if the integer part alone needs more than `precision` digits
    /// - `PrecisionLoss` for `RoundingMode::Unnecessary` when digits are dropped
    pub fn apply(&self, value: Decimal) -> NumericResult<Decimal> {
        let mut rounded = value;
        if !self.has_unlimited_scale() && rounded.scale() > self.max_scale as u32 {
            rounded = self.rounding.round_decimal(rounded, self.max_scale as u32)?;
        }
        if self.has_unlimited_precision() {
            return Ok(rounded);
        }
        // A carry (9.99 -> 10.0) can add a digit, hence the loop.
        loop {
            let digits = digit_count(&rounded);
            if digits <= self.precision {
                return Ok(rounded);
            }
            let excess = digits - self.precision;
            if excess > rounded.scale() {
                return Err(NumericError::Overflow);
            }
            rounded = self
                .rounding
                .round_decimal(rounded, rounded.scale() - excess)?;
        }
    }

    /// Like [`NumericContext::apply`], failing instead of rounding.
    ///
    /// # Errors
    /// Returns `PrecisionLoss` if the rounded value differs from `value`.
    pub fn apply_strict(&self, value: Decimal) -> NumericResult<Decimal> {
        let rounded = self.apply(value)?;
        if rounded != value {
            tracing::debug!(%value, %rounded, "rejecting value that would be rounded");
            return Err(NumericError::PrecisionLoss {
                value: value.to_string(),
                rounded: rounded.to_string(),
            });
        }
        Ok(value)
    }
}

impl Default for NumericContext {
    fn default() -> Self {
        Self::DEFAULT
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
    fn test_named_contexts() {
        assert_eq!(NumericContext::default(), NumericContext::DEFAULT);
        assert_eq!(NumericContext::DEFAULT.max_scale(), 4);
        assert!(NumericContext::MAXIMAL.has_unlimited_precision());
        assert!(NumericContext::MAXIMAL.has_unlimited_scale());
        assert!(NumericContext::DEFAULT.validate().is_ok());
        assert!(NumericContext::MAXIMAL.validate().is_ok());
    }

    #[test]
    fn test_builder_and_validation() {
        let ctx = NumericContext::DEFAULT
            .with_precision(10)
            .with_max_scale(2)
            .with_rounding(RoundingMode::HalfEven);
        assert_eq!(ctx, NumericContext::new(10, 2, RoundingMode::HalfEven));
        assert!(NumericContext::DEFAULT.with_max_scale(-2).validate().is_err());
        assert!(NumericContext::DEFAULT.with_max_scale(29).validate().is_err());
    }

    #[test]
    fn test_apply_rounds_scale() {
        let ctx = NumericContext::DEFAULT.with_max_scale(2);
        assert_eq!(ctx.apply(dec("1.23456")).unwrap(), dec("1.23"));
        assert_eq!(ctx.apply(dec("1.2")).unwrap().to_string(), "1.2");
    }

    #[test]
    fn test_apply_rounds_precision() {
        let ctx = NumericContext::new(3, -1, RoundingMode::HalfUp);
        assert_eq!(ctx.apply(dec("1.2345")).unwrap(), dec("1.23"));
        assert_eq!(ctx.apply(dec("99.99")).unwrap().to_string(), "100");
        assert_eq!(ctx.apply(dec("1234")), Err(NumericError::Overflow));
    }

    #[test]
    fn test_apply_strict() {
        let ctx = NumericContext::DEFAULT.with_max_scale(2);
        assert!(matches!(
            ctx.apply_strict(dec("1.23456")),
            Err(NumericError::PrecisionLoss { .. })
        ));
        assert_eq!(ctx.apply_strict(dec("1.20")).unwrap().to_string(), "1.20");
    }

    #[test]
    fn test_widened_for() {
        let ctx = NumericContext::DEFAULT.widened_for(&dec("1.23456"));
        assert_eq!(ctx.max_scale(), 5);
        let ctx = NumericContext::DEFAULT.widened_for(&dec("1.5"));
        assert_eq!(ctx, NumericContext::DEFAULT);
        let ctx = NumericContext::MAXIMAL.widened_for(&dec("1.23456"));
        assert_eq!(ctx, NumericContext::MAXIMAL);
    }
}
