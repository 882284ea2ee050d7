// ============================================================================
// Values Module
// Validators and the value-type registry
// ============================================================================

mod registry;
mod validators;

pub use registry::ValueRegistry;
pub use validators::{CheckDigitValidator, FractionValidator, NumberValidator, PackedValidator};
