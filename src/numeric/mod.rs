// ============================================================================
// Numeric Module
// Exact arithmetic primitives: packed decimals, fractions, rounding
// ============================================================================
//
// This module provides:
// - NumericValue: common conversions and ordering over a decimal projection
// - PackedDecimal: 4-bit packed digit/punctuation strings with arithmetic
// - Fraction: exact rationals over arbitrary-precision integers
// - RoundingMode: rounding rules shared by decimals and fractions
// - NumericError: error types for every fallible operation
//
// Design principles:
// - No floating-point operations on the arithmetic paths
// - All fallible arithmetic returns Result (no panics)
// - Values are immutable and freely shareable across threads

mod errors;
mod fraction;
mod intern;
mod packed_decimal;
mod primes;
mod rounding;
mod value;

pub use errors::{InvalidArgument, NumericError, NumericResult};
pub use fraction::Fraction;
pub use intern::{InternCache, DEFAULT_INTERN_CAPACITY};
pub use packed_decimal::{intern_cache, Operand, PackedDecimal};
pub use primes::Primes;
pub use rounding::{RoundingMode, MAX_DECIMAL_SCALE};
pub use value::{IntoDecimal, NumericValue};

pub(crate) use value::{digit_count, parse_decimal};
