// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod check_digit;
mod validator;
mod value_type;

pub use check_digit::CheckDigitScheme;
pub use validator::Validator;
pub use value_type::{DomainValue, ValueType};
