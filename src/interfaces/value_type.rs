// ============================================================================
// Value Type Interface
// Tag-addressable construction of domain values
// ============================================================================

use crate::money::Money;
use crate::numeric::{Fraction, NumericResult, PackedDecimal};
use std::fmt;

/// Any value a [`ValueType`] can construct
#[derive(Debug, Clone, PartialEq)]
pub enum DomainValue {
    Packed(PackedDecimal),
    Fraction(Fraction),
    Money(Money),
    /// Identifier text that passed its check-digit scheme
    Checked(String),
}

impl fmt::Display for DomainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainValue::Packed(p) => write!(f, "{}", p),
            DomainValue::Fraction(q) => write!(f, "{}", q),
            DomainValue::Money(m) => write!(f, "{}", m),
            DomainValue::Checked(s) => f.write_str(s),
        }
    }
}

/// Constructor and validator for one kind of domain value
///
/// Registered in a [`ValueRegistry`](crate::values::ValueRegistry) under
/// its `name()`.
pub trait ValueType: Send + Sync {
    /// Type tag, e.g. `"Money"`
    fn name(&self) -> &str;

    /// Check the arguments without building the value
    fn validate(&self, args: &[&str]) -> NumericResult<()>;

    /// Build the value from its textual arguments
    fn construct(&self, args: &[&str]) -> NumericResult<DomainValue>;
}
