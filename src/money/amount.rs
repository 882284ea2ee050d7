// ============================================================================
// Monetary Amount
// Exact decimal value bound to a currency and a numeric context
// ============================================================================

use super::context::NumericContext;
use super::currency::{resolve_global, CurrencyUnit};
use crate::numeric::{
    Fraction, IntoDecimal, NumericError, NumericResult, NumericValue, RoundingMode,
};
use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Fractional digits kept by the dividend and quotient of [`Money::divide`].
pub const DIVISION_SCALE: u32 = 4;

/// An exact amount of money.
///
/// Two equivalence relations exist:
/// - `==` compares the *displayed* value (rounded HALF_UP to the currency's
///   fraction digits) and the currency code. Amounts of different currencies
///   are simply unequal.
/// - [`Money::is_equal_to`] compares the exact value and fails with
///   `CurrencyMismatch` for different currencies.
///
/// `Money` deliberately has no `Ord`; [`Money::compare_to`] provides a total
/// order for sorting.
#[derive(Debug, Clone)]
pub struct Money {
    value: Decimal,
    currency: CurrencyUnit,
    context: NumericContext,
}

impl Money {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Strict construction under the default context, widened to the
    /// literal's own scale and digit count.
    ///
    /// # Errors
    /// `UnknownCurrency`, `Parse` for malformed text, `Overflow`.
    pub fn of(value: impl IntoDecimal, currency: &str) -> NumericResult<Self> {
        Self::of_unit(value, resolve_global(currency)?)
    }

    pub fn of_unit(value: impl IntoDecimal, currency: CurrencyUnit) -> NumericResult<Self> {
        let value = value.into_decimal()?;
        let context = NumericContext::DEFAULT.widened_for(&value);
        Self::strict(value, currency, context)
    }

    /// Strict construction under an explicit context.
    ///
    /// # Errors
    /// `PrecisionLoss` if the context would round `value`.
    pub fn of_with_context(
        value: impl IntoDecimal,
        currency: &str,
        context: NumericContext,
    ) -> NumericResult<Self> {
        Self::of_unit_with_context(value, resolve_global(currency)?, context)
    }

    pub fn of_unit_with_context(
        value: impl IntoDecimal,
        currency: CurrencyUnit,
        context: NumericContext,
    ) -> NumericResult<Self> {
        Self::strict(value.into_decimal()?, currency, context)
    }

    /// Lossy construction: `value` is silently rounded into `context`.
    pub fn of_rounded(
        value: impl IntoDecimal,
        currency: &str,
        context: NumericContext,
    ) -> NumericResult<Self> {
        Self::of_unit_rounded(value, resolve_global(currency)?, context)
    }

    pub fn of_unit_rounded(
        value: impl IntoDecimal,
        currency: CurrencyUnit,
        context: NumericContext,
    ) -> NumericResult<Self> {
        Self::lossy(value.into_decimal()?, currency, context)
    }

    pub fn zero(currency: &str) -> NumericResult<Self> {
        Ok(Self::zero_unit(resolve_global(currency)?))
    }

    pub fn zero_unit(currency: CurrencyUnit) -> Self {
        Self {
            value: Decimal::ZERO,
            currency,
            context: NumericContext::DEFAULT,
        }
    }

    pub(crate) fn strict(
        value: Decimal,
        currency: CurrencyUnit,
        context: NumericContext,
    ) -> NumericResult<Self> {
        let value = context.apply_strict(value)?;
        Ok(Self {
            value,
            currency,
            context,
        })
    }

    pub(crate) fn lossy(
        value: Decimal,
        currency: CurrencyUnit,
        context: NumericContext,
    ) -> NumericResult<Self> {
        let rounded = context.apply(value)?;
        if rounded != value {
            tracing::debug!(%value, %rounded, currency = currency.code(), "rounded into context");
        }
        Ok(Self {
            value: rounded,
            currency,
            context,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The exact value.
    pub fn number(&self) -> Decimal {
        self.value
    }

    pub fn currency(&self) -> &CurrencyUnit {
        &self.currency
    }

    pub fn currency_code(&self) -> &str {
        self.currency.code()
    }

    pub fn context(&self) -> NumericContext {
        self.context
    }

    /// Re-round into another context.
    ///
    /// # Errors
    /// `PrecisionLoss` if the new context cannot hold the value.
    pub fn with_context(&self, context: NumericContext) -> NumericResult<Self> {
        Self::strict(self.value, self.currency.clone(), context)
    }

    /// Round to the currency's natural fraction digits with the context's
    /// rounding mode.
    pub fn round_to_currency(&self) -> NumericResult<Self> {
        let rounded = self
            .context
            .rounding()
            .round_decimal(self.value, self.currency.fraction_digits())?;
        self.with_value(rounded)
    }

    fn with_value(&self, value: Decimal) -> NumericResult<Self> {
        Self::lossy(value, self.currency.clone(), self.context)
    }

    fn check_currency(&self, other: &Money) -> NumericResult<()> {
        if self.currency.code() != other.currency.code() {
            return Err(NumericError::mismatch(
                self.currency.code(),
                other.currency.code(),
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    /// Sum of two amounts of the same currency.
    ///
    /// A zero `other` of any currency is an identity.
    pub fn add(&self, other: &Money) -> NumericResult<Self> {
        if other.is_zero() {
            tracing::trace!(
                currency = self.currency.code(),
                zero_currency = other.currency.code(),
                "adding zero amount"
            );
            return Ok(self.clone());
        }
        self.check_currency(other)?;
        let sum = self
            .value
            .checked_add(other.value)
            .ok_or(NumericError::Overflow)?;
        self.with_value(sum)
    }

    pub fn subtract(&self, other: &Money) -> NumericResult<Self> {
        self.check_currency(other)?;
        let difference = self
            .value
            .checked_sub(other.value)
            .ok_or(NumericError::Overflow)?;
        self.with_value(difference)
    }

    pub fn multiply(&self, factor: impl IntoDecimal) -> NumericResult<Self> {
        let product = self
            .value
            .checked_mul(factor.into_decimal()?)
            .ok_or(NumericError::Overflow)?;
        self.with_value(product)
    }

    /// Quotient with bounded intermediate precision.
    ///
    /// The dividend is rounded HALF_UP to [`DIVISION_SCALE`] digits and the
    /// exact quotient is rounded HALF_UP to the same scale before the
    /// context is applied, so `10 / 3` yields `3.3333`.
    pub fn divide(&self, divisor: impl IntoDecimal) -> NumericResult<Self> {
        let divisor = divisor.into_decimal()?;
        if divisor.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        let dividend = RoundingMode::HalfUp.round_decimal(self.value, DIVISION_SCALE)?;
        let quotient = Fraction::quotient_of(dividend, divisor)?
            .to_decimal_rounded(DIVISION_SCALE, RoundingMode::HalfUp)?;
        self.with_value(quotient)
    }

    /// Remainder of truncating division; the sign follows the dividend.
    pub fn remainder(&self, divisor: impl IntoDecimal) -> NumericResult<Self> {
        let divisor = divisor.into_decimal()?;
        let remainder = self
            .value
            .checked_rem(divisor)
            .ok_or(NumericError::DivisionByZero)?;
        self.with_value(remainder)
    }

    /// Integer part of the exact quotient, truncated toward zero.
    pub fn divide_to_integral_value(&self, divisor: impl IntoDecimal) -> NumericResult<Self> {
        let quotient = Fraction::quotient_of(self.value, divisor.into_decimal()?)?
            .to_decimal_rounded(0, RoundingMode::Down)?;
        self.with_value(quotient)
    }

    /// `(divide_to_integral_value, remainder)` for the same divisor.
    pub fn divide_and_remainder(&self, divisor: impl IntoDecimal) -> NumericResult<(Self, Self)> {
        let divisor = divisor.into_decimal()?;
        Ok((
            self.divide_to_integral_value(divisor)?,
            self.remainder(divisor)?,
        ))
    }

    pub fn negate(&self) -> Self {
        Self {
            value: -self.value,
            currency: self.currency.clone(),
            context: self.context,
        }
    }

    pub fn abs(&self) -> Self {
        Self {
            value: self.value.abs(),
            currency: self.currency.clone(),
            context: self.context,
        }
    }

    // ========================================================================
    // Sign Predicates
    // ========================================================================

    pub fn signum(&self) -> i32 {
        if self.value.is_zero() {
            0
        } else if self.value.is_sign_negative() {
            -1
        } else {
            1
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.signum() > 0
    }

    pub fn is_negative(&self) -> bool {
        self.signum() < 0
    }

    pub fn is_positive_or_zero(&self) -> bool {
        self.signum() >= 0
    }

    pub fn is_negative_or_zero(&self) -> bool {
        self.signum() <= 0
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// Total order for sorting: currency code first, then exact value.
    ///
    /// Unlike the strict comparisons this never fails, so amounts of mixed
    /// currencies sort into per-currency runs.
    pub fn compare_to(&self, other: &Money) -> Ordering {
        self.currency
            .code()
            .cmp(other.currency.code())
            .then_with(|| self.value.cmp(&other.value))
    }

    fn strict_cmp(&self, other: &Money) -> NumericResult<Ordering> {
        self.check_currency(other)?;
        Ok(self.value.cmp(&other.value))
    }

    pub fn is_greater_than(&self, other: &Money) -> NumericResult<bool> {
        Ok(self.strict_cmp(other)? == Ordering::Greater)
    }

    pub fn is_greater_than_or_equal_to(&self, other: &Money) -> NumericResult<bool> {
        Ok(self.strict_cmp(other)? != Ordering::Less)
    }

    pub fn is_less_than(&self, other: &Money) -> NumericResult<bool> {
        Ok(self.strict_cmp(other)? == Ordering::Less)
    }

    pub fn is_less_than_or_equal_to(&self, other: &Money) -> NumericResult<bool> {
        Ok(self.strict_cmp(other)? != Ordering::Greater)
    }

    /// Exact equality of the raw values.
    pub fn is_equal_to(&self, other: &Money) -> NumericResult<bool> {
        Ok(self.strict_cmp(other)? == Ordering::Equal)
    }

    /// Value rounded HALF_UP to `digits` fractional digits, padded with zeros.
    pub(crate) fn rounded_to(&self, digits: u32) -> Decimal {
        let mut rounded = self
            .value
            .round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
        if rounded.scale() < digits {
            rounded.rescale(digits);
        }
        rounded
    }

    /// The value as shown to users.
    pub(crate) fn display_value(&self) -> Decimal {
        self.rounded_to(self.currency.fraction_digits())
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.currency.code() == other.currency.code()
            && self.display_value() == other.display_value()
    }
}

impl Eq for Money {}

impl Hash for Money {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.currency.code().hash(state);
        self.display_value().normalize().hash(state);
    }
}

impl NumericValue for Money {
    fn to_decimal(&self) -> NumericResult<Decimal> {
        Ok(self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn eur(value: &str) -> Money {
        Money::of(value, "EUR").unwrap()
    }

    #[test]
    fn test_strict_construction_keeps_literal() {
        let m = eur("12.50");
        assert_eq!(m.number().to_string(), "12.50");
        assert_eq!(m.currency_code(), "EUR");
        assert_eq!(m.context(), NumericContext::DEFAULT);
    }

    #[test]
    fn test_default_context_widens_to_literal() {
        let m = eur("1.23456");
        assert_eq!(m.number().to_string(), "1.23456");
        assert_eq!(m.context().max_scale(), 5);
    }

    #[test]
    fn test_strict_vs_lossy() {
        let ctx = NumericContext::DEFAULT.with_max_scale(2);
        assert!(matches!(
            Money::of_with_context("1.23456", "EUR", ctx),
            Err(NumericError::PrecisionLoss { .. })
        ));
        let m = Money::of_rounded("1.23456", "EUR", ctx).unwrap();
        assert_eq!(m.number(), Decimal::from_str("1.23").unwrap());
    }

    #[test]
    fn test_unknown_currency() {
        assert_eq!(
            Money::of(1, "XYZ").unwrap_err(),
            NumericError::UnknownCurrency("XYZ".to_string())
        );
    }

    #[test]
    fn test_add_and_subtract() {
        let sum = eur("1.50").add(&eur("2.25")).unwrap();
        assert_eq!(sum.number(), Decimal::from_str("3.75").unwrap());
        let diff = eur("1.50").subtract(&eur("2.25")).unwrap();
        assert!(diff.is_negative());
        assert_eq!(diff.number(), Decimal::from_str("-0.75").unwrap());
    }

    #[test]
    fn test_currency_mismatch() {
        let one_eur = Money::of(1, "EUR").unwrap();
        let one_usd = Money::of(1, "USD").unwrap();
        assert_eq!(
            one_eur.add(&one_usd).unwrap_err(),
            NumericError::mismatch("EUR", "USD")
        );
        assert!(one_eur.subtract(&one_usd).is_err());
        assert!(one_eur.is_greater_than(&one_usd).is_err());
        assert!(one_eur.is_equal_to(&one_usd).is_err());
    }

    #[test]
    fn test_zero_of_any_currency_is_identity() {
        let amount = eur("7.25");
        let zero_usd = Money::zero("USD").unwrap();
        assert_eq!(amount.add(&zero_usd).unwrap(), amount);
        assert_eq!(amount.add(&Money::zero("JPY").unwrap()).unwrap(), amount);
    }

    #[test]
    fn test_divide_bounded_intermediate() {
        let q = Money::of(10, "EUR").unwrap().divide(3).unwrap();
        assert_eq!(q.number().to_string(), "3.3333");
        let q = eur("1.00005").divide(1).unwrap();
        assert_eq!(q.number().to_string(), "1.0001");
        assert_eq!(
            eur("1").divide(0).unwrap_err(),
            NumericError::DivisionByZero
        );
    }

    #[test]
    fn test_divide_by_large_semiprime() {
        // 1000000007 * 1000000009
        let semiprime = "1000000016000000063";
        let q = Money::of(semiprime, "EUR").unwrap().divide(semiprime).unwrap();
        assert_eq!(q.number().to_string(), "1.0000");
        let q = Money::of("2000000032000000126", "EUR")
            .unwrap()
            .divide_to_integral_value(semiprime)
            .unwrap();
        assert_eq!(q.number(), Decimal::from(2));
    }

    #[test]
    fn test_multiply_rounds_into_context() {
        let m = eur("1.11").multiply("1.111").unwrap();
        assert_eq!(m.number(), Decimal::from_str("1.2332").unwrap());
    }

    #[test]
    fn test_integral_division_and_remainder() {
        let m = eur("10.50");
        let (q, r) = m.divide_and_remainder(4).unwrap();
        assert_eq!(q.number(), Decimal::from(2));
        assert_eq!(r.number(), Decimal::from_str("2.50").unwrap());
        let q = eur("-10.50").divide_to_integral_value(4).unwrap();
        assert_eq!(q.number(), Decimal::from(-2));
        assert_eq!(m.remainder(0).unwrap_err(), NumericError::DivisionByZero);
    }

    #[test]
    fn test_sign_predicates() {
        let m = eur("-3");
        assert_eq!(m.signum(), -1);
        assert!(m.is_negative_or_zero());
        assert!(m.negate().is_positive());
        assert_eq!(m.abs(), m.negate());
        let zero = Money::zero("EUR").unwrap();
        assert!(zero.is_zero() && zero.is_positive_or_zero() && zero.is_negative_or_zero());
    }

    #[test]
    fn test_display_equality_vs_exact_equality() {
        let a = eur("1.001");
        let b = eur("1.004");
        assert_eq!(a, b);
        assert!(!a.is_equal_to(&b).unwrap());
        assert_ne!(eur("1"), Money::of(1, "USD").unwrap());
    }

    #[test]
    fn test_hash_follows_display_equality() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(eur("2.5"));
        assert!(set.contains(&eur("2.50")));
        assert!(set.contains(&eur("2.501")));
    }

    #[test]
    fn test_strict_comparisons() {
        let small = eur("1.00");
        let large = eur("2.00");
        assert!(large.is_greater_than(&small).unwrap());
        assert!(large.is_greater_than_or_equal_to(&large).unwrap());
        assert!(small.is_less_than(&large).unwrap());
        assert!(small.is_less_than_or_equal_to(&small).unwrap());
    }

    #[test]
    fn test_compare_to_total_order() {
        let mut amounts = vec![
            Money::of(5, "USD").unwrap(),
            eur("3"),
            eur("1"),
            Money::of(2, "USD").unwrap(),
        ];
        amounts.sort_by(|a, b| a.compare_to(b));
        let codes: Vec<String> = amounts
            .iter()
            .map(|m| format!("{} {}", m.number(), m.currency_code()))
            .collect();
        assert_eq!(codes, vec!["1 EUR", "3 EUR", "2 USD", "5 USD"]);
    }

    #[test]
    fn test_with_context_and_round_to_currency() {
        let m = eur("1.2345");
        assert!(m.with_context(NumericContext::DEFAULT.with_max_scale(2)).is_err());
        assert_eq!(
            m.round_to_currency().unwrap().number(),
            Decimal::from_str("1.23").unwrap()
        );
        let yen = Money::of("1234.5", "JPY").unwrap();
        assert_eq!(yen.round_to_currency().unwrap().number(), Decimal::from(1235));
    }

    #[test]
    fn test_numeric_value_projection() {
        let m = eur("-12.99");
        assert_eq!(NumericValue::to_i64(&m).unwrap(), -12);
        assert_eq!(m.cmp_value(&Decimal::from(-13)).unwrap(), Ordering::Greater);
    }

    proptest! {
        #[test]
        fn prop_zero_identity(cents in -1_000_000i64..1_000_000, code in "(EUR|USD|GBP|CHF|JPY)") {
            let amount = Money::of(Decimal::new(cents, 2), "EUR").unwrap();
            let zero = Money::zero(&code).unwrap();
            let sum = amount.add(&zero).unwrap();
            prop_assert!(sum.is_equal_to(&amount).unwrap());
        }
    }
}
