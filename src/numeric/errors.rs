// ============================================================================
// Numeric Errors
// Error types for exact arithmetic, encoding and money operations
// ============================================================================

use std::fmt;

/// Errors that can occur while encoding, parsing or computing exact values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NumericError {
    /// Character outside the packed-decimal alphabet
    Encoding { character: char, position: usize },
    /// Arithmetic requested on a value that is neither a number nor a fraction
    InvalidOperation(String),
    /// Binary operation between amounts of different currencies
    CurrencyMismatch { expected: String, actual: String },
    /// Strict construction would have rounded the literal value
    PrecisionLoss { value: String, rounded: String },
    /// Malformed numeric, fraction or money text
    Parse { text: String, reason: String },
    /// Attempted division by zero
    DivisionByZero,
    /// Result does not fit the decimal representation
    Overflow,
    /// Currency code or symbol not known to the lookup
    UnknownCurrency(String),
    /// A money value was requested without ever naming a currency
    MissingCurrency,
    /// Supplied check digit differs from the computed one
    InvalidCheckDigit {
        value: String,
        expected: String,
        actual: String,
    },
    /// No value type registered under this tag
    UnknownValueType(String),
}

impl NumericError {
    pub(crate) fn parse(text: impl Into<String>, reason: impl Into<String>) -> Self {
        NumericError::Parse {
            text: text.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn mismatch(expected: &str, actual: &str) -> Self {
        NumericError::CurrencyMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::Encoding {
                character,
                position,
            } => write!(
                f,
                "encoding error: illegal character {:?} at position {}",
                character, position
            ),
            NumericError::InvalidOperation(reason) => write!(f, "invalid operation: {}", reason),
            NumericError::CurrencyMismatch { expected, actual } => {
                write!(f, "currency mismatch: expected {}, got {}", expected, actual)
            },
            NumericError::PrecisionLoss { value, rounded } => write!(
                f,
                "precision loss: {} would be rounded to {}",
                value, rounded
            ),
            NumericError::Parse { text, reason } => {
                write!(f, "cannot parse {:?}: {}", text, reason)
            },
            NumericError::DivisionByZero => write!(f, "division by zero"),
            NumericError::Overflow => {
                write!(f, "arithmetic overflow: result exceeded decimal range")
            },
            NumericError::UnknownCurrency(code) => write!(f, "unknown currency: {}", code),
            NumericError::MissingCurrency => write!(f, "no currency was set"),
            NumericError::InvalidCheckDigit {
                value,
                expected,
                actual,
            } => write!(
                f,
                "invalid check digit in {}: expected {}, found {}",
                value, expected, actual
            ),
            NumericError::UnknownValueType(tag) => write!(f, "unknown value type: {}", tag),
        }
    }
}

impl std::error::Error for NumericError {}

/// Result type alias for numeric operations
pub type NumericResult<T> = Result<T, NumericError>;

/// Catch-all failure produced by the `verify` path of a validator.
///
/// Wraps the typed [`NumericError`] so callers that only want one error type
/// can still reach the cause through [`std::error::Error::source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidArgument {
    cause: NumericError,
}

impl InvalidArgument {
    pub fn cause(&self) -> &NumericError {
        &self.cause
    }

    pub fn into_cause(self) -> NumericError {
        self.cause
    }
}

impl From<NumericError> for InvalidArgument {
    fn from(cause: NumericError) -> Self {
        Self { cause }
    }
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid argument: {}", self.cause)
    }
}

impl std::error::Error for InvalidArgument {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        assert_eq!(NumericError::DivisionByZero.to_string(), "division by zero");
        assert_eq!(
            NumericError::Encoding {
                character: 'x',
                position: 3
            }
            .to_string(),
            "encoding error: illegal character 'x' at position 3"
        );
        assert_eq!(
            NumericError::mismatch("EUR", "USD").to_string(),
            "currency mismatch: expected EUR, got USD"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(NumericError::Overflow, NumericError::Overflow);
        assert_ne!(NumericError::Overflow, NumericError::DivisionByZero);
    }

    #[test]
    fn test_invalid_argument_wraps_cause() {
        let err = InvalidArgument::from(NumericError::parse("1/x", "bad denominator"));
        assert!(err.to_string().starts_with("invalid argument: cannot parse"));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "cannot parse \"1/x\": bad denominator");
        assert!(matches!(err.into_cause(), NumericError::Parse { .. }));
    }
}
