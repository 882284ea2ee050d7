// ============================================================================
// Fraction
// Exact rational numbers over arbitrary-precision integers
// ============================================================================

use super::errors::{NumericError, NumericResult};
use super::primes::Primes;
use super::rounding::{RoundingMode, MAX_DECIMAL_SCALE};
use super::value::{is_decimal_literal, IntoDecimal, NumericValue};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

/// Exact rational number `numerator / denominator`.
///
/// The constructor moves the sign into the numerator, so the denominator is
/// always positive. Common factors are kept until [`Fraction::reduce`] is
/// called explicitly: `Fraction::new(2, 4)` displays as `2/4`.
///
/// Equality and hashing use the reduced form, so `1/2 == 2/4`. Ordering
/// cross-multiplies and is therefore consistent with equality.
///
/// # Example
/// ```
/// use exact_values::numeric::Fraction;
///
/// let half: Fraction = "2/4".parse().unwrap();
/// assert_eq!(half.reduce().to_string(), "1/2");
/// ```
#[derive(Clone, Debug)]
pub struct Fraction {
    numerator: BigInt,
    denominator: BigInt,
}

impl Fraction {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create `numerator / denominator` without reducing.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if the denominator is zero.
    pub fn new(numerator: impl Into<BigInt>, denominator: impl Into<BigInt>) -> NumericResult<Self> {
        let numerator = numerator.into();
        let denominator = denominator.into();
        if denominator.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        Ok(Self::normalized(numerator, denominator))
    }

    fn normalized(numerator: BigInt, denominator: BigInt) -> Self {
        if denominator.is_negative() {
            Self {
                numerator: -numerator,
                denominator: -denominator,
            }
        } else {
            Self {
                numerator,
                denominator,
            }
        }
    }

    /// Create `value / 1`.
    pub fn from_integer(value: impl Into<BigInt>) -> Self {
        Self {
            numerator: value.into(),
            denominator: BigInt::one(),
        }
    }

    /// Create `unscaled / 10^scale` from a decimal, e.g. `1.25` -> `125/100`.
    pub fn from_decimal(value: Decimal) -> Self {
        Self {
            numerator: BigInt::from(value.mantissa()),
            denominator: pow10(value.scale()),
        }
    }

    /// Exact quotient of two decimals, not reduced: `1.5 / 0.25` -> `1500/250`.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `divisor` is zero.
    pub fn quotient_of(dividend: Decimal, divisor: Decimal) -> NumericResult<Self> {
        Self::new(
            BigInt::from(dividend.mantissa()) * pow10(divisor.scale()),
            BigInt::from(divisor.mantissa()) * pow10(dividend.scale()),
        )
    }

    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    pub fn one() -> Self {
        Self::from_integer(1)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn numerator(&self) -> &BigInt {
        &self.numerator
    }

    /// Always positive.
    pub fn denominator(&self) -> &BigInt {
        &self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.numerator.is_negative()
    }

    /// -1, 0 or 1.
    pub fn signum(&self) -> i32 {
        if self.numerator.is_zero() {
            0
        } else if self.numerator.is_negative() {
            -1
        } else {
            1
        }
    }

    // ========================================================================
    // Unary Operations
    // ========================================================================

    /// Remove common factors from numerator and denominator.
    ///
    /// Trial-divides by ascending primes against the smaller of the two
    /// magnitudes, so the cost grows with the size of that value rather than
    /// with its digit count. Zero reduces to `0/1`.
    pub fn reduce(&self) -> Self {
        if self.numerator.is_zero() {
            return Self::zero();
        }
        if self.denominator.bits() > 64 {
            tracing::warn!(
                bits = self.denominator.bits(),
                "reducing fraction with a very large denominator"
            );
        }

        let mut numerator = self.numerator.clone();
        let mut denominator = self.denominator.clone();
        let mut rest = numerator.abs().min(denominator.clone());

        for p in Primes::new() {
            let prime = BigInt::from(p);
            if &prime * &prime > rest {
                break;
            }
            if !rest.is_multiple_of(&prime) {
                continue;
            }
            while rest.is_multiple_of(&prime) {
                rest /= &prime;
            }
            divide_out(&mut numerator, &mut denominator, &prime);
        }
        // Whatever is left of the smaller magnitude is a single prime factor.
        if rest > BigInt::one() {
            divide_out(&mut numerator, &mut denominator, &rest);
        }

        Self {
            numerator,
            denominator,
        }
    }

    /// Same value as [`Fraction::reduce`], found through the gcd.
    pub(crate) fn lowest_terms(&self) -> Self {
        if self.numerator.is_zero() {
            return Self::zero();
        }
        let divisor = self.numerator.gcd(&self.denominator);
        Self {
            numerator: &self.numerator / &divisor,
            denominator: &self.denominator / &divisor,
        }
    }

    /// Swap numerator and denominator without reducing.
    ///
    /// # Errors
    /// Returns `DivisionByZero` for a zero fraction.
    pub fn reciprocal(&self) -> NumericResult<Self> {
        Self::new(self.denominator.clone(), self.numerator.clone())
    }

    /// Negate the numerator.
    pub fn negate(&self) -> Self {
        Self {
            numerator: -&self.numerator,
            denominator: self.denominator.clone(),
        }
    }

    pub fn abs(&self) -> Self {
        Self {
            numerator: self.numerator.abs(),
            denominator: self.denominator.clone(),
        }
    }

    // ========================================================================
    // Binary Operations
    // ========================================================================

    /// Sum over the product of both denominators; not reduced.
    #[allow(clippy::should_implement_trait)]
    pub fn add(&self, other: &Fraction) -> Self {
        Self {
            numerator: &self.numerator * &other.denominator + &other.numerator * &self.denominator,
            denominator: &self.denominator * &other.denominator,
        }
    }

    /// Difference over the product of both denominators; not reduced.
    pub fn subtract(&self, other: &Fraction) -> Self {
        self.add(&other.negate())
    }

    /// Product, reduced.
    pub fn multiply(&self, other: &Fraction) -> Self {
        Self {
            numerator: &self.numerator * &other.numerator,
            denominator: &self.denominator * &other.denominator,
        }
        .reduce()
    }

    /// Quotient, reduced.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `other` is zero.
    pub fn divide(&self, other: &Fraction) -> NumericResult<Self> {
        Ok(self.multiply(&other.reciprocal()?))
    }

    // ========================================================================
    // Decimal Conversion
    // ========================================================================

    /// Whether the quotient has a finite decimal expansion.
    pub fn is_terminating(&self) -> bool {
        let (_, _, rest) = split_two_five(&self.lowest_terms().denominator);
        rest.is_one()
    }

    /// Exact decimal value of the quotient.
    ///
    /// # Errors
    /// - `InvalidOperation` if the quotient does not terminate (e.g. `1/3`);
    ///   use [`Fraction::to_decimal_rounded`] for those
    /// - `Overflow` if the value exceeds the decimal range
    pub fn to_exact_decimal(&self) -> NumericResult<Decimal> {
        let reduced = self.lowest_terms();
        let (twos, fives, rest) = split_two_five(&reduced.denominator);
        if !rest.is_one() {
            return Err(NumericError::InvalidOperation(format!(
                "{} has no terminating decimal expansion",
                self
            )));
        }
        let scale = twos.max(fives);
        if scale > MAX_DECIMAL_SCALE {
            return Err(NumericError::Overflow);
        }
        let mantissa = &reduced.numerator * (pow10(scale) / &reduced.denominator);
        decimal_from_parts(&mantissa, scale)
    }

    /// Quotient rounded to `scale` fractional digits.
    ///
    /// # Errors
    /// - `PrecisionLoss` with `RoundingMode::Unnecessary` if digits are dropped
    /// - `Overflow` if the value exceeds the decimal range
    pub fn to_decimal_rounded(&self, scale: u32, mode: RoundingMode) -> NumericResult<Decimal> {
        if scale > MAX_DECIMAL_SCALE {
            return Err(NumericError::Overflow);
        }
        let scaled = &self.numerator * pow10(scale);
        let mantissa = mode.div_round(&scaled, &self.denominator)?;
        decimal_from_parts(&mantissa, scale)
    }
}

fn pow10(exponent: u32) -> BigInt {
    BigInt::from(10u32).pow(exponent)
}

fn divide_out(numerator: &mut BigInt, denominator: &mut BigInt, factor: &BigInt) {
    while numerator.is_multiple_of(factor) && denominator.is_multiple_of(factor) {
        *numerator /= factor;
        *denominator /= factor;
    }
}

/// Split `value` into `2^twos * 5^fives * rest`.
fn split_two_five(value: &BigInt) -> (u32, u32, BigInt) {
    let two = BigInt::from(2u32);
    let five = BigInt::from(5u32);
    let mut rest = value.clone();
    let mut twos = 0;
    let mut fives = 0;
    while !rest.is_zero() && rest.is_multiple_of(&two) {
        rest /= &two;
        twos += 1;
    }
    while !rest.is_zero() && rest.is_multiple_of(&five) {
        rest /= &five;
        fives += 1;
    }
    (twos, fives, rest)
}

fn decimal_from_parts(mantissa: &BigInt, scale: u32) -> NumericResult<Decimal> {
    let mantissa = mantissa.to_i128().ok_or(NumericError::Overflow)?;
    Decimal::try_from_i128_with_scale(mantissa, scale).map_err(|_| NumericError::Overflow)
}

fn parse_integer(text: &str, whole: &str) -> NumericResult<BigInt> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NumericError::parse(whole, format!("{:?} is not an integer", text)));
    }
    let value = BigInt::from_str(body).map_err(|e| NumericError::parse(whole, e.to_string()))?;
    Ok(if trimmed.starts_with('-') { -value } else { value })
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        let left = self.lowest_terms();
        let right = other.lowest_terms();
        left.numerator == right.numerator && left.denominator == right.denominator
    }
}

impl Eq for Fraction {}

impl Hash for Fraction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let reduced = self.lowest_terms();
        reduced.numerator.hash(state);
        reduced.denominator.hash(state);
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    /// Sign of `n1·d2 − n2·d1`; valid because denominators are positive.
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.numerator * &other.denominator).cmp(&(&other.numerator * &self.denominator))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for Fraction {
    type Err = NumericError;

    /// Parse `"n/d"` or a plain decimal such as `"1.25"` (-> `125/100`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if let Some((num, den)) = text.split_once('/') {
            let numerator = parse_integer(num, s)?;
            let denominator = parse_integer(den, s)?;
            return Self::new(numerator, denominator);
        }

        if !is_decimal_literal(text, &['.']) {
            return Err(NumericError::parse(s, "not a fraction or decimal number"));
        }
        let negative = text.starts_with('-');
        let body = text.trim_start_matches(['+', '-']);
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        let digits = format!("{}{}", int_part, frac_part);
        let magnitude =
            BigInt::from_str(&digits).map_err(|e| NumericError::parse(s, e.to_string()))?;
        let numerator = if negative { -magnitude } else { magnitude };
        Ok(Self {
            numerator,
            denominator: pow10(frac_part.len() as u32),
        })
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl From<BigInt> for Fraction {
    fn from(value: BigInt) -> Self {
        Self::from_integer(value)
    }
}

impl From<Decimal> for Fraction {
    fn from(value: Decimal) -> Self {
        Self::from_decimal(value)
    }
}

impl NumericValue for Fraction {
    fn to_decimal(&self) -> NumericResult<Decimal> {
        self.to_exact_decimal()
    }

    fn to_i128(&self) -> NumericResult<i128> {
        (&self.numerator / &self.denominator)
            .to_i128()
            .ok_or(NumericError::Overflow)
    }

    fn to_f64(&self) -> NumericResult<f64> {
        match (self.numerator.to_f64(), self.denominator.to_f64()) {
            (Some(n), Some(d)) if n.is_finite() && d.is_finite() => Ok(n / d),
            _ => Err(NumericError::Overflow),
        }
    }
}

impl IntoDecimal for &Fraction {
    fn into_decimal(self) -> NumericResult<Decimal> {
        self.to_exact_decimal()
    }
}

// Only the borrowed form implements `Add`, so the inherent `add(&self, ..)`
// keeps winning method resolution on owned values.
impl Add for &Fraction {
    type Output = Fraction;

    fn add(self, rhs: &Fraction) -> Fraction {
        Fraction::add(self, rhs)
    }
}

impl Sub for &Fraction {
    type Output = Fraction;

    fn sub(self, rhs: &Fraction) -> Fraction {
        self.subtract(rhs)
    }
}

impl Sub for Fraction {
    type Output = Fraction;

    fn sub(self, rhs: Fraction) -> Fraction {
        self.subtract(&rhs)
    }
}

impl Mul for &Fraction {
    type Output = Fraction;

    fn mul(self, rhs: &Fraction) -> Fraction {
        self.multiply(rhs)
    }
}

impl Mul for Fraction {
    type Output = Fraction;

    fn mul(self, rhs: Fraction) -> Fraction {
        self.multiply(&rhs)
    }
}

impl Neg for Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        self.negate()
    }
}

impl Neg for &Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        self.negate()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn frac(s: &str) -> Fraction {
        s.parse().unwrap()
    }

    #[test]
    fn test_reduce() {
        assert_eq!(frac("2/4").reduce().to_string(), "1/2");
        assert_eq!(frac("12/18").reduce().to_string(), "2/3");
        assert_eq!(frac("-21/49").reduce().to_string(), "-3/7");
        assert_eq!(frac("0/5").reduce().to_string(), "0/1");
        assert_eq!(frac("7/14").reduce().to_string(), "1/2");
        // large prime factor shared by both sides
        assert_eq!(frac("2006/3009").reduce().to_string(), "2/3");
    }

    #[test]
    fn test_constructor_does_not_reduce() {
        assert_eq!(Fraction::new(2, 4).unwrap().to_string(), "2/4");
    }

    #[test]
    fn test_sign_normalization() {
        let f = Fraction::new(1, -2).unwrap();
        assert_eq!(f.to_string(), "-1/2");
        assert_eq!(f, Fraction::new(-1, 2).unwrap());
        assert_eq!(f.cmp(&Fraction::new(-1, 2).unwrap()), Ordering::Equal);
        assert!(Fraction::new(-1, -2).unwrap() > Fraction::zero());
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(Fraction::new(1, 0), Err(NumericError::DivisionByZero));
        assert!(matches!(
            "1/0".parse::<Fraction>(),
            Err(NumericError::DivisionByZero)
        ));
    }

    #[test]
    fn test_equality_uses_reduced_form() {
        assert_eq!(Fraction::new(1, 2).unwrap(), Fraction::new(2, 4).unwrap());
        assert_ne!(Fraction::new(1, 2).unwrap(), Fraction::new(2, 3).unwrap());
    }

    #[test]
    fn test_reciprocal_and_negate() {
        assert_eq!(frac("2/4").reciprocal().unwrap().to_string(), "4/2");
        assert_eq!(frac("-2/3").reciprocal().unwrap().to_string(), "-3/2");
        assert_eq!(Fraction::zero().reciprocal(), Err(NumericError::DivisionByZero));
        assert_eq!(frac("2/3").negate().to_string(), "-2/3");
        assert_eq!(frac("-2/3").abs().to_string(), "2/3");
    }

    #[test]
    fn test_add_uses_product_denominator() {
        assert_eq!(frac("1/2").add(&frac("1/3")).to_string(), "5/6");
        assert_eq!(frac("1/2").add(&frac("1/2")).to_string(), "4/4");
        assert_eq!(frac("1/4").subtract(&frac("1/4")).to_string(), "0/16");
        assert_eq!((&frac("1/2") + &frac("1/6")).reduce().to_string(), "2/3");
    }

    #[test]
    fn test_multiply_and_divide_reduce() {
        assert_eq!(frac("2/3").multiply(&frac("3/4")).to_string(), "1/2");
        assert_eq!(frac("1/2").divide(&frac("1/4")).unwrap().to_string(), "2/1");
        assert_eq!(
            frac("1/2").divide(&Fraction::zero()),
            Err(NumericError::DivisionByZero)
        );
        assert_eq!((&frac("-1/2") * &frac("4/3")).to_string(), "-2/3");
    }

    #[test]
    fn test_ordering() {
        assert!(frac("1/3") < frac("1/2"));
        assert!(frac("-1/2") < frac("1/3"));
        assert_eq!(frac("3/6").cmp(&frac("1/2")), Ordering::Equal);
    }

    #[test]
    fn test_parse_decimal_form() {
        let f = frac("1.25");
        assert_eq!(f.to_string(), "125/100");
        assert_eq!(f.reduce().to_string(), "5/4");
        assert_eq!(frac("-0.5").reduce().to_string(), "-1/2");
        assert_eq!(frac(" 3 / 4 ").to_string(), "3/4");
        assert_eq!(frac("+3/-4").to_string(), "-3/4");
    }

    #[test]
    fn test_parse_errors_name_the_text() {
        match "1/x".parse::<Fraction>() {
            Err(NumericError::Parse { text, .. }) => assert_eq!(text, "1/x"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(
            "abc".parse::<Fraction>(),
            Err(NumericError::Parse { .. })
        ));
        assert!("1/2/3".parse::<Fraction>().is_err());
    }

    #[test]
    fn test_to_decimal_terminating() {
        assert_eq!(frac("1/4").to_exact_decimal().unwrap().to_string(), "0.25");
        assert_eq!(frac("-3/8").to_exact_decimal().unwrap().to_string(), "-0.375");
        assert_eq!(frac("10/5").to_exact_decimal().unwrap().to_string(), "2");
        assert!(frac("1/4").is_terminating());
    }

    #[test]
    fn test_to_decimal_non_terminating() {
        assert!(!frac("1/3").is_terminating());
        assert!(matches!(
            frac("1/3").to_exact_decimal(),
            Err(NumericError::InvalidOperation(_))
        ));
        assert_eq!(
            frac("1/3")
                .to_decimal_rounded(4, RoundingMode::HalfUp)
                .unwrap()
                .to_string(),
            "0.3333"
        );
        assert_eq!(
            frac("-2/3")
                .to_decimal_rounded(2, RoundingMode::HalfUp)
                .unwrap()
                .to_string(),
            "-0.67"
        );
    }

    #[test]
    fn test_quotient_of_keeps_factors() {
        let q = Fraction::quotient_of(
            Decimal::from_str("1.5").unwrap(),
            Decimal::from_str("0.25").unwrap(),
        )
        .unwrap();
        assert_eq!(q.to_string(), "1500/250");
        assert_eq!(q, Fraction::from_integer(6));
        assert_eq!(
            Fraction::quotient_of(Decimal::ONE, Decimal::ZERO),
            Err(NumericError::DivisionByZero)
        );
    }

    #[test]
    fn test_decimal_conversion_with_large_prime_factors() {
        // 1000000007 * 1000000009
        let semiprime = BigInt::from(1_000_000_016_000_000_063i64);
        let f = Fraction::new(&semiprime * 8, &semiprime * 5).unwrap();
        assert!(f.is_terminating());
        assert_eq!(f.to_exact_decimal().unwrap().to_string(), "1.6");
        assert_eq!(f, Fraction::new(8, 5).unwrap());

        let g = Fraction::new(semiprime.clone(), &semiprime * 3).unwrap();
        assert!(!g.is_terminating());
        assert_eq!(g.lowest_terms().to_string(), "1/3");
    }

    #[test]
    fn test_numeric_value_conversions() {
        assert_eq!(NumericValue::to_i64(&frac("7/2")).unwrap(), 3);
        assert_eq!(NumericValue::to_i64(&frac("-7/2")).unwrap(), -3);
        let third = NumericValue::to_f64(&frac("1/3")).unwrap();
        assert!((third - 1.0 / 3.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_reduce_is_idempotent(n in -100_000i64..100_000, d in 1i64..100_000) {
            let once = Fraction::new(n, d).unwrap().reduce();
            let twice = once.reduce();
            prop_assert_eq!(once.numerator(), twice.numerator());
            prop_assert_eq!(once.denominator(), twice.denominator());
        }

        #[test]
        fn prop_reduce_preserves_value(n in -100_000i64..100_000, d in 1i64..100_000) {
            let f = Fraction::new(n, d).unwrap();
            prop_assert_eq!(f.cmp(&f.reduce()), Ordering::Equal);
        }

        #[test]
        fn prop_ordering_is_antisymmetric(
            a in -1000i64..1000, b in 1i64..1000,
            c in -1000i64..1000, d in 1i64..1000,
        ) {
            let x = Fraction::new(a, b).unwrap();
            let y = Fraction::new(c, d).unwrap();
            prop_assert_eq!(x.cmp(&y), y.cmp(&x).reverse());
        }

        #[test]
        fn prop_ordering_is_transitive(
            a in -100i64..100, b in 1i64..100,
            c in -100i64..100, d in 1i64..100,
            e in -100i64..100, f in 1i64..100,
        ) {
            let x = Fraction::new(a, b).unwrap();
            let y = Fraction::new(c, d).unwrap();
            let z = Fraction::new(e, f).unwrap();
            if x <= y && y <= z {
                prop_assert!(x <= z);
            }
        }
    }
}
