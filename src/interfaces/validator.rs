// ============================================================================
// Validator Interface
// Typed validation with a catch-all verification path
// ============================================================================

use crate::numeric::{InvalidArgument, NumericResult};

/// Checks a candidate value before it becomes a domain value
///
/// `validate` reports the typed [`NumericError`](crate::NumericError);
/// `verify` wraps it in [`InvalidArgument`] for callers that only want one
/// failure type.
pub trait Validator<T>: Send + Sync {
    /// Return the value unchanged if acceptable
    fn validate(&self, value: T) -> NumericResult<T>;

    fn verify(&self, value: T) -> Result<T, InvalidArgument> {
        self.validate(value).map_err(InvalidArgument::from)
    }

    fn is_valid(&self, value: T) -> bool {
        self.validate(value).is_ok()
    }
}
