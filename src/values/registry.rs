// ============================================================================
// Value Registry
// Explicit tag -> ValueType table for dynamic construction
// ============================================================================

use super::validators::{CheckDigitValidator, FractionValidator, PackedValidator};
use crate::checkdigit::{Mod10, Mod97};
use crate::interfaces::{CheckDigitScheme, DomainValue, Validator, ValueType};
use crate::money::{Money, MoneyParser};
use crate::numeric::{Fraction, InvalidArgument, NumericError, NumericResult, PackedDecimal};
use std::collections::HashMap;
use std::str::FromStr;

fn arity_error(tag: &str, args: &[&str], wanted: &str) -> NumericError {
    NumericError::parse(
        args.join(" "),
        format!("{} takes {} argument(s), got {}", tag, wanted, args.len()),
    )
}

// ============================================================================
// Core Value Types
// ============================================================================

/// `["12.50"]` -> interned packed decimal
struct PackedType;

impl ValueType for PackedType {
    fn name(&self) -> &str {
        "PackedDecimal"
    }

    fn validate(&self, args: &[&str]) -> NumericResult<()> {
        match args {
            [text] => PackedValidator.validate(*text).map(|_| ()),
            _ => Err(arity_error(self.name(), args, "1")),
        }
    }

    fn construct(&self, args: &[&str]) -> NumericResult<DomainValue> {
        match args {
            [text] => PackedDecimal::of(text).map(DomainValue::Packed),
            _ => Err(arity_error(self.name(), args, "1")),
        }
    }
}

/// `["3/4"]`, `["1.25"]` or `["3", "4"]`
struct FractionType;

impl ValueType for FractionType {
    fn name(&self) -> &str {
        "Fraction"
    }

    fn validate(&self, args: &[&str]) -> NumericResult<()> {
        match args {
            [text] => FractionValidator.validate(*text).map(|_| ()),
            _ => self.construct(args).map(|_| ()),
        }
    }

    fn construct(&self, args: &[&str]) -> NumericResult<DomainValue> {
        let fraction = match args {
            [text] => Fraction::from_str(text)?,
            [num, den] => Fraction::from_str(&format!("{}/{}", num.trim(), den.trim()))?,
            _ => return Err(arity_error(self.name(), args, "1 or 2")),
        };
        Ok(DomainValue::Fraction(fraction))
    }
}

/// `["12.50 EUR"]` or `["12.50", "EUR"]`
struct MoneyType;

impl ValueType for MoneyType {
    fn name(&self) -> &str {
        "Money"
    }

    fn validate(&self, args: &[&str]) -> NumericResult<()> {
        self.construct(args).map(|_| ())
    }

    fn construct(&self, args: &[&str]) -> NumericResult<DomainValue> {
        let money = match args {
            [text] => MoneyParser::global().parse(text)?,
            [value, currency] => Money::of(value.trim(), currency)?,
            _ => return Err(arity_error(self.name(), args, "1 or 2")),
        };
        Ok(DomainValue::Money(money))
    }
}

/// Identifier guarded by a check-digit scheme
struct CheckedType<S> {
    name: &'static str,
    validator: CheckDigitValidator<S>,
}

impl<S: CheckDigitScheme> ValueType for CheckedType<S> {
    fn name(&self) -> &str {
        self.name
    }

    fn validate(&self, args: &[&str]) -> NumericResult<()> {
        match args {
            [text] => self.validator.validate(*text).map(|_| ()),
            _ => Err(arity_error(self.name, args, "1")),
        }
    }

    fn construct(&self, args: &[&str]) -> NumericResult<DomainValue> {
        self.validate(args)?;
        Ok(DomainValue::Checked(args[0].trim().to_string()))
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Explicitly populated table of value types
///
/// # Example
/// ```
/// use exact_values::prelude::*;
///
/// let registry = ValueRegistry::with_core_types();
/// let value = registry.construct("Fraction", &["2/4"]).unwrap();
/// assert_eq!(value.to_string(), "2/4");
/// assert!(registry.validate("Luhn", &["1234567897"]).is_ok());
/// ```
#[derive(Default)]
pub struct ValueRegistry {
    types: HashMap<String, Box<dyn ValueType>>,
}

impl ValueRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `PackedDecimal`, `Fraction`, `Money`, `IBAN` and `Luhn`
    pub fn with_core_types() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(PackedType));
        registry.register(Box::new(FractionType));
        registry.register(Box::new(MoneyType));
        registry.register(Box::new(CheckedType {
            name: "IBAN",
            validator: CheckDigitValidator::new(Mod97::new()),
        }));
        registry.register(Box::new(CheckedType {
            name: "Luhn",
            validator: CheckDigitValidator::new(Mod10::luhn()),
        }));
        registry
    }

    /// Register a value type under its name, replacing any previous entry
    pub fn register(&mut self, value_type: Box<dyn ValueType>) {
        let tag = value_type.name().to_string();
        tracing::debug!(tag = %tag, "registering value type");
        if self.types.insert(tag.clone(), value_type).is_some() {
            tracing::debug!(tag = %tag, "replaced existing value type");
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.types.contains_key(tag)
    }

    /// Registered tags in sorted order
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.types.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, tag: &str) -> NumericResult<&dyn ValueType> {
        self.types
            .get(tag)
            .map(|value_type| value_type.as_ref())
            .ok_or_else(|| NumericError::UnknownValueType(tag.to_string()))
    }

    pub fn construct(&self, tag: &str, args: &[&str]) -> NumericResult<DomainValue> {
        self.get(tag)?.construct(args)
    }

    pub fn validate(&self, tag: &str, args: &[&str]) -> NumericResult<()> {
        self.get(tag)?.validate(args)
    }

    /// Like `validate`, with the failure wrapped in [`InvalidArgument`]
    pub fn verify(&self, tag: &str, args: &[&str]) -> Result<(), InvalidArgument> {
        self.validate(tag, args).map_err(InvalidArgument::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_types_registered() {
        let registry = ValueRegistry::with_core_types();
        assert_eq!(
            registry.tags(),
            vec!["Fraction", "IBAN", "Luhn", "Money", "PackedDecimal"]
        );
        assert_eq!(registry.len(), 5);
        assert!(ValueRegistry::new().is_empty());
    }

    #[test]
    fn test_construct_each_type() {
        let registry = ValueRegistry::with_core_types();
        assert_eq!(
            registry.construct("PackedDecimal", &["12.50"]).unwrap(),
            DomainValue::Packed(PackedDecimal::encode("12.50").unwrap())
        );
        assert_eq!(
            registry.construct("Fraction", &["1", "2"]).unwrap(),
            DomainValue::Fraction(Fraction::new(2, 4).unwrap())
        );
        assert_eq!(
            registry.construct("Money", &["19.99", "EUR"]).unwrap(),
            DomainValue::Money(Money::of("19.99", "EUR").unwrap())
        );
        assert_eq!(
            registry.construct("Money", &["€ 5"]).unwrap().to_string(),
            "5 EUR"
        );
        assert_eq!(
            registry
                .construct("IBAN", &["DE89370400440532013000"])
                .unwrap(),
            DomainValue::Checked("DE89370400440532013000".to_string())
        );
    }

    #[test]
    fn test_validate_failures() {
        let registry = ValueRegistry::with_core_types();
        assert!(matches!(
            registry.validate("Luhn", &["2134567897"]),
            Err(NumericError::InvalidCheckDigit { .. })
        ));
        assert!(matches!(
            registry.validate("Fraction", &["1/0"]),
            Err(NumericError::DivisionByZero)
        ));
        assert!(matches!(
            registry.validate("PackedDecimal", &["1", "2"]),
            Err(NumericError::Parse { .. })
        ));
        assert_eq!(
            registry.construct("Date", &["2024-01-01"]).unwrap_err(),
            NumericError::UnknownValueType("Date".to_string())
        );
    }

    #[test]
    fn test_verify_wraps_failure() {
        let registry = ValueRegistry::with_core_types();
        let err = registry.verify("Money", &["12", "XYZ"]).unwrap_err();
        assert_eq!(
            err.cause(),
            &NumericError::UnknownCurrency("XYZ".to_string())
        );
        assert!(registry.verify("IBAN", &["GB82WEST12345698765432"]).is_ok());
    }

    #[test]
    fn test_custom_registration_replaces() {
        struct Upper;
        impl ValueType for Upper {
            fn name(&self) -> &str {
                "Luhn"
            }
            fn validate(&self, _args: &[&str]) -> NumericResult<()> {
                Ok(())
            }
            fn construct(&self, args: &[&str]) -> NumericResult<DomainValue> {
                Ok(DomainValue::Checked(args.join("").to_uppercase()))
            }
        }

        let mut registry = ValueRegistry::with_core_types();
        registry.register(Box::new(Upper));
        assert_eq!(registry.len(), 5);
        assert_eq!(
            registry.construct("Luhn", &["ab"]).unwrap(),
            DomainValue::Checked("AB".to_string())
        );
    }
}
