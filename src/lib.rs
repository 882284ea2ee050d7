// ============================================================================
// Exact Values Library
// Exact-precision numeric core: packed decimals, fractions, money
// ============================================================================

//! # Exact Values
//!
//! Value types for amounts that must never silently lose precision.
//!
//! ## Features
//!
//! - **PackedDecimal**: two characters per byte over a digit/punctuation
//!   alphabet, with arithmetic on numbers and fractions
//! - **Fraction**: exact rationals over arbitrary-precision integers
//! - **Money**: currency-aware amounts with strict and lossy construction
//! - **Check digits**: Luhn, weighted Mod10 and IBAN Mod97
//! - **Value registry**: construct and validate values by type tag
//!
//! ## Example
//!
//! ```rust
//! use exact_values::prelude::*;
//!
//! // Strict construction keeps the literal
//! let price = Money::of("19.99", "EUR").unwrap();
//! assert_eq!(price.to_short_string(), "€20");
//!
//! // Division keeps four fractional digits
//! let share = Money::of(10, "EUR").unwrap().divide(3).unwrap();
//! assert_eq!(share.to_string(), "3.3333 EUR");
//!
//! // Fractions stay exact
//! let half: Fraction = "2/4".parse().unwrap();
//! assert_eq!(half.reduce().to_string(), "1/2");
//!
//! // Check digits
//! assert!(Mod10::luhn().is_valid("1234567897"));
//! ```

pub mod checkdigit;
pub mod interfaces;
pub mod money;
pub mod numeric;
pub mod values;

pub use money::Money;
pub use numeric::{Fraction, NumericError, NumericResult, PackedDecimal};

// Re-exports for convenience
pub mod prelude {
    pub use crate::checkdigit::{Mod10, Mod97};
    pub use crate::interfaces::{CheckDigitScheme, DomainValue, Validator, ValueType};
    pub use crate::money::{
        CurrencyLookup, CurrencyRegistry, CurrencyUnit, Money, MoneyConfig, MoneyFactory,
        MoneyParser, NumericContext,
    };
    pub use crate::numeric::{
        Fraction, IntoDecimal, InvalidArgument, NumericError, NumericResult, NumericValue,
        PackedDecimal, RoundingMode,
    };
    pub use crate::values::{
        CheckDigitValidator, FractionValidator, NumberValidator, PackedValidator, ValueRegistry,
    };
}
