// ============================================================================
// Check-Digit Scheme Interface
// Defines the contract for pluggable check-digit algorithms
// ============================================================================

use crate::numeric::NumericResult;

/// Strategy interface for check-digit algorithms
/// Implementations: Mod10 (Luhn and weighted variants), Mod97 (IBAN)
pub trait CheckDigitScheme: Send + Sync {
    /// Get the scheme name for logging
    fn name(&self) -> &str;

    /// Shortest value (payload plus check digits) the scheme accepts
    fn min_length(&self) -> usize;

    /// The supplied check digits inside `value`
    /// Default: the last character
    fn check_digit<'a>(&self, value: &'a str) -> &'a str {
        match value.char_indices().last() {
            Some((pos, _)) => &value[pos..],
            None => "",
        }
    }

    /// `value` without its check digits
    /// Default: everything but the last character
    fn payload(&self, value: &str) -> String {
        match value.char_indices().last() {
            Some((pos, _)) => value[..pos].to_string(),
            None => String::new(),
        }
    }

    /// Compute the check digits for a payload
    ///
    /// # Errors
    /// `Parse` if the payload contains characters the scheme cannot weigh
    fn compute_check_digit(&self, payload: &str) -> NumericResult<String>;

    /// Whether the supplied check digits match the computed ones
    ///
    /// Short or malformed input is simply invalid.
    fn is_valid(&self, value: &str) -> bool {
        let value = value.trim();
        if value.chars().count() < self.min_length() {
            return false;
        }
        match self.compute_check_digit(&self.payload(value)) {
            Ok(expected) => expected == self.check_digit(value),
            Err(_) => false,
        }
    }
}
