// ============================================================================
// Validators
// Concrete Validator implementations for textual candidates
// ============================================================================

use crate::interfaces::{CheckDigitScheme, Validator};
use crate::numeric::{Fraction, NumericError, NumericResult, PackedDecimal};
use std::str::FromStr;

/// Accepts text that encodes as a plain decimal number
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberValidator;

impl<'a> Validator<&'a str> for NumberValidator {
    fn validate(&self, value: &'a str) -> NumericResult<&'a str> {
        if PackedDecimal::encode(value)?.is_number() {
            Ok(value)
        } else {
            Err(NumericError::parse(value, "not a number"))
        }
    }
}

/// Accepts `"n/d"` fractions and decimal literals
#[derive(Debug, Clone, Copy, Default)]
pub struct FractionValidator;

impl<'a> Validator<&'a str> for FractionValidator {
    fn validate(&self, value: &'a str) -> NumericResult<&'a str> {
        Fraction::from_str(value)?;
        Ok(value)
    }
}

/// Accepts anything inside the packed-decimal alphabet
#[derive(Debug, Clone, Copy, Default)]
pub struct PackedValidator;

impl<'a> Validator<&'a str> for PackedValidator {
    fn validate(&self, value: &'a str) -> NumericResult<&'a str> {
        PackedDecimal::encode(value)?;
        Ok(value)
    }
}

/// Compares supplied and computed check digits of a scheme
#[derive(Debug, Clone, Default)]
pub struct CheckDigitValidator<S> {
    scheme: S,
}

impl<S: CheckDigitScheme> CheckDigitValidator<S> {
    pub fn new(scheme: S) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> &S {
        &self.scheme
    }
}

impl<'a, S: CheckDigitScheme> Validator<&'a str> for CheckDigitValidator<S> {
    fn validate(&self, value: &'a str) -> NumericResult<&'a str> {
        let trimmed = value.trim();
        if trimmed.chars().count() < self.scheme.min_length() {
            return Err(NumericError::parse(
                value,
                format!("{} needs at least {} characters", self.scheme.name(), self.scheme.min_length()),
            ));
        }
        let expected = self.scheme.compute_check_digit(&self.scheme.payload(trimmed))?;
        let actual = self.scheme.check_digit(trimmed);
        if expected != actual {
            return Err(NumericError::InvalidCheckDigit {
                value: trimmed.to_string(),
                expected,
                actual: actual.to_string(),
            });
        }
        Ok(value)
    }
}
