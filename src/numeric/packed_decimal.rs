// ============================================================================
// Packed Decimal
// Two characters per byte over a 16-symbol digit/punctuation alphabet
// ============================================================================
//
// Nibble table (bit-exact):
//
//   0x0-0x9  digits 0-9     0xC  '+'
//   0xA      '/'            0xD  '-'
//   0xB      blank (tab)    0xE  '.'
//                           0xF  ','
//
// A string of length n occupies ceil(n/2) bytes, high nibble first. Odd
// lengths are padded with a trailing blank which decode drops again. Input is
// trimmed before encoding, so a trailing blank is always the pad.

use super::errors::{NumericError, NumericResult};
use super::fraction::Fraction;
use super::intern::InternCache;
use super::rounding::{RoundingMode, MAX_DECIMAL_SCALE};
use super::value::{is_decimal_literal, parse_decimal, IntoDecimal, NumericValue};
use num_bigint::BigInt;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

const SYMBOLS: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '/', ' ', '+', '-', '.', ',',
];

const BLANK: u8 = 0xB;

fn nibble_of(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        '/' => Some(0xA),
        ' ' | '\t' => Some(BLANK),
        '+' => Some(0xC),
        '-' => Some(0xD),
        '.' => Some(0xE),
        ',' => Some(0xF),
        _ => None,
    }
}

fn pack(nibbles: &[u8]) -> Arc<[u8]> {
    nibbles
        .chunks(2)
        .map(|pair| (pair[0] << 4) | pair.get(1).copied().unwrap_or(BLANK))
        .collect()
}

static INTERNED: OnceLock<InternCache<PackedDecimal>> = OnceLock::new();

/// Process-wide cache used by [`PackedDecimal::of`].
pub fn intern_cache() -> &'static InternCache<PackedDecimal> {
    INTERNED.get_or_init(InternCache::default)
}

/// Immutable packed encoding of a digit/punctuation string.
///
/// Any string over the alphabet can be stored, including ones that are not
/// numbers (`"+49/811 32 16-8"`). Equality and hashing use the decoded text,
/// so leading zeros matter: `"0711" != "711"`.
///
/// Arithmetic is defined for numbers (`"12.50"`, `"-3"`, `"1,5"`) and
/// fractions (`"3/4"`). If either operand is a fraction the computation runs
/// on [`Fraction`] and the result is stored as `"<num>/<den>"`; otherwise it
/// runs on exact decimals.
///
/// # Example
/// ```
/// use exact_values::numeric::PackedDecimal;
///
/// let price = PackedDecimal::encode("12.50").unwrap();
/// assert_eq!(price.as_bytes(), &[0x12, 0xE5, 0x0B]);
/// assert_eq!(price.decode(), "12.50");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PackedDecimal {
    bytes: Arc<[u8]>,
}

/// Right-hand side accepted by the packed arithmetic operations.
#[derive(Debug, Clone)]
pub enum Operand {
    Packed(PackedDecimal),
    Decimal(Decimal),
    Fraction(Fraction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Arithmetic view of a packed value.
enum Classified {
    Decimal(Decimal),
    Fraction(Fraction),
}

impl Classified {
    fn into_fraction(self) -> Fraction {
        match self {
            Classified::Decimal(d) => Fraction::from_decimal(d),
            Classified::Fraction(f) => f,
        }
    }
}

impl PackedDecimal {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Encode `text` after trimming surrounding whitespace.
    ///
    /// # Errors
    /// Returns `Encoding` naming the first character outside the alphabet and
    /// its position in `text`.
    pub fn encode(text: &str) -> NumericResult<Self> {
        let trimmed = text.trim();
        let offset = text[..text.len() - text.trim_start().len()].chars().count();

        let mut nibbles = Vec::with_capacity(trimmed.len());
        for (i, c) in trimmed.chars().enumerate() {
            let nibble = nibble_of(c).ok_or(NumericError::Encoding {
                character: c,
                position: offset + i,
            })?;
            nibbles.push(nibble);
        }

        Ok(Self {
            bytes: pack(&nibbles),
        })
    }

    /// Like [`PackedDecimal::encode`], sharing the instance through the
    /// process-wide intern cache.
    pub fn of(text: &str) -> NumericResult<Self> {
        intern_cache().get_or_try_insert(text.trim(), || Self::encode(text))
    }

    /// Rebuild a value from raw packed bytes.
    ///
    /// Every byte sequence decodes, so this cannot fail; the result is
    /// re-packed in canonical (trimmed) form.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let text = decode_bytes(bytes);
        let nibbles: Vec<u8> = text.trim().chars().filter_map(nibble_of).collect();
        Self {
            bytes: pack(&nibbles),
        }
    }

    fn from_decimal(value: Decimal) -> NumericResult<Self> {
        Self::encode(&value.to_string())
    }

    fn from_fraction(value: &Fraction) -> NumericResult<Self> {
        Self::encode(&value.to_string())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Decoded text, without the pad blank.
    pub fn decode(&self) -> String {
        decode_bytes(&self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of encoded characters.
    pub fn len(&self) -> usize {
        let nibbles = self.bytes.len() * 2;
        match self.bytes.last() {
            Some(last) if last & 0x0F == BLANK => nibbles - 1,
            _ => nibbles,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the text is a decimal number (`[+-]digits[.|,digits]`).
    pub fn is_number(&self) -> bool {
        is_decimal_literal(&self.decode(), &['.', ','])
    }

    /// Whether the text is `<int>/<int>`, blanks around the slash allowed.
    pub fn is_fraction(&self) -> bool {
        let text = self.decode();
        match text.split_once('/') {
            Some((num, den)) => is_integer(num.trim()) && is_integer(den.trim()),
            None => false,
        }
    }

    fn classify(&self) -> NumericResult<Classified> {
        let text = self.decode();
        if is_decimal_literal(&text, &['.', ',']) {
            let text = text.replace(',', ".");
            let scale = text.split_once('.').map_or(0, |(_, frac)| frac.len());
            return match parse_decimal(&text) {
                Ok(value) if value.scale() as usize == scale => Ok(Classified::Decimal(value)),
                // Too many digits for a decimal; carried exactly as a fraction.
                _ => Fraction::from_str(&text).map(Classified::Fraction),
            };
        }
        if self.is_fraction() {
            return Fraction::from_str(&text).map(Classified::Fraction);
        }
        Err(NumericError::InvalidOperation(format!(
            "{:?} is neither a number nor a fraction",
            text
        )))
    }

    /// Exact fraction view of a number or fraction.
    pub fn to_fraction(&self) -> NumericResult<Fraction> {
        self.classify().map(Classified::into_fraction)
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    #[allow(clippy::should_implement_trait)]
    pub fn add(&self, rhs: impl Into<Operand>) -> NumericResult<Self> {
        self.combine(rhs.into(), BinaryOp::Add)
    }

    pub fn subtract(&self, rhs: impl Into<Operand>) -> NumericResult<Self> {
        self.combine(rhs.into(), BinaryOp::Subtract)
    }

    pub fn multiply(&self, rhs: impl Into<Operand>) -> NumericResult<Self> {
        self.combine(rhs.into(), BinaryOp::Multiply)
    }

    /// Quotient. Two decimals give a decimal when the quotient terminates and
    /// the exact fraction otherwise (`1 / 3` -> `"1/3"`).
    pub fn divide(&self, rhs: impl Into<Operand>) -> NumericResult<Self> {
        self.combine(rhs.into(), BinaryOp::Divide)
    }

    fn combine(&self, rhs: Operand, op: BinaryOp) -> NumericResult<Self> {
        let left = self.classify()?;
        let right = match rhs {
            Operand::Packed(p) => p.classify()?,
            Operand::Decimal(d) => Classified::Decimal(d),
            Operand::Fraction(f) => Classified::Fraction(f),
        };

        match (left, right) {
            (Classified::Decimal(a), Classified::Decimal(b)) => decimal_op(a, b, op),
            (a, b) => {
                let (a, b) = (a.into_fraction(), b.into_fraction());
                let result = match op {
                    BinaryOp::Add => a.add(&b),
                    BinaryOp::Subtract => a.subtract(&b),
                    BinaryOp::Multiply => a.multiply(&b),
                    BinaryOp::Divide => a.divide(&b)?,
                };
                Self::from_fraction(&result)
            },
        }
    }

    pub fn negate(&self) -> NumericResult<Self> {
        match self.classify()? {
            Classified::Decimal(d) => Self::from_decimal(-d),
            Classified::Fraction(f) => Self::from_fraction(&f.negate()),
        }
    }

    pub fn abs(&self) -> NumericResult<Self> {
        match self.classify()? {
            Classified::Decimal(d) => Self::from_decimal(d.abs()),
            Classified::Fraction(f) => Self::from_fraction(&f.abs()),
        }
    }

    /// Divide by `10^n`: `"12.50"` -> `"1.250"`.
    pub fn move_point_left(&self, n: u32) -> NumericResult<Self> {
        match self.classify()? {
            Classified::Decimal(d) => {
                let scale = d.scale().checked_add(n).ok_or(NumericError::Overflow)?;
                if scale > MAX_DECIMAL_SCALE {
                    return Err(NumericError::Overflow);
                }
                let moved = Decimal::try_from_i128_with_scale(d.mantissa(), scale)
                    .map_err(|_| NumericError::Overflow)?;
                Self::from_decimal(moved)
            },
            Classified::Fraction(f) => {
                let shift = Fraction::new(1, BigInt::from(10u32).pow(n))?;
                Self::from_fraction(&f.multiply(&shift))
            },
        }
    }

    /// Multiply by `10^n`: `"12.50"` -> `"125.0"`.
    pub fn move_point_right(&self, n: u32) -> NumericResult<Self> {
        match self.classify()? {
            Classified::Decimal(d) => {
                let scale = d.scale();
                let moved = if n <= scale {
                    Decimal::try_from_i128_with_scale(d.mantissa(), scale - n)
                } else {
                    let factor = 10i128
                        .checked_pow(n - scale)
                        .ok_or(NumericError::Overflow)?;
                    let mantissa = d
                        .mantissa()
                        .checked_mul(factor)
                        .ok_or(NumericError::Overflow)?;
                    Decimal::try_from_i128_with_scale(mantissa, 0)
                };
                Self::from_decimal(moved.map_err(|_| NumericError::Overflow)?)
            },
            Classified::Fraction(f) => {
                let shift = Fraction::from_integer(BigInt::from(10u32).pow(n));
                Self::from_fraction(&f.multiply(&shift))
            },
        }
    }

    /// Round to exactly `scale` fractional digits; fractions become decimals.
    pub fn set_scale(&self, scale: u32, mode: RoundingMode) -> NumericResult<Self> {
        let rounded = match self.classify()? {
            Classified::Decimal(d) => mode.round_decimal(d, scale)?,
            Classified::Fraction(f) => f.to_decimal_rounded(scale, mode)?,
        };
        Self::from_decimal(rounded)
    }
}

fn decode_bytes(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        text.push(SYMBOLS[(byte >> 4) as usize]);
        text.push(SYMBOLS[(byte & 0x0F) as usize]);
    }
    if text.ends_with(' ') {
        text.pop();
    }
    text
}

fn is_integer(text: &str) -> bool {
    let digits = text
        .strip_prefix('+')
        .or_else(|| text.strip_prefix('-'))
        .unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn decimal_op(a: Decimal, b: Decimal, op: BinaryOp) -> NumericResult<PackedDecimal> {
    let result = match op {
        BinaryOp::Add => a.checked_add(b).ok_or(NumericError::Overflow)?,
        BinaryOp::Subtract => a.checked_sub(b).ok_or(NumericError::Overflow)?,
        BinaryOp::Multiply => a.checked_mul(b).ok_or(NumericError::Overflow)?,
        BinaryOp::Divide => {
            if b.is_zero() {
                return Err(NumericError::DivisionByZero);
            }
            let quotient = Fraction::quotient_of(a, b)?.lowest_terms();
            return match quotient.to_exact_decimal() {
                Ok(exact) => PackedDecimal::from_decimal(exact),
                Err(_) => PackedDecimal::from_fraction(&quotient),
            };
        },
    };
    PackedDecimal::from_decimal(result)
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl fmt::Display for PackedDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.decode())
    }
}

impl fmt::Debug for PackedDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackedDecimal({:?})", self.decode())
    }
}

impl FromStr for PackedDecimal {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::encode(s)
    }
}

impl NumericValue for PackedDecimal {
    fn to_decimal(&self) -> NumericResult<Decimal> {
        match self.classify()? {
            Classified::Decimal(d) => Ok(d),
            Classified::Fraction(f) => f.to_exact_decimal(),
        }
    }

    fn to_i128(&self) -> NumericResult<i128> {
        match self.classify()? {
            Classified::Decimal(d) => d.to_i128(),
            Classified::Fraction(f) => f.to_i128(),
        }
    }

    fn to_f64(&self) -> NumericResult<f64> {
        match self.classify()? {
            Classified::Decimal(d) => d.to_f64(),
            Classified::Fraction(f) => f.to_f64(),
        }
    }
}

impl IntoDecimal for &PackedDecimal {
    fn into_decimal(self) -> NumericResult<Decimal> {
        self.to_decimal()
    }
}

impl From<PackedDecimal> for Operand {
    fn from(value: PackedDecimal) -> Self {
        Operand::Packed(value)
    }
}

impl From<&PackedDecimal> for Operand {
    fn from(value: &PackedDecimal) -> Self {
        Operand::Packed(value.clone())
    }
}

impl From<Decimal> for Operand {
    fn from(value: Decimal) -> Self {
        Operand::Decimal(value)
    }
}

impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Operand::Decimal(Decimal::from(value))
    }
}

impl From<i64> for Operand {
    fn from(value: i64) -> Self {
        Operand::Decimal(Decimal::from(value))
    }
}

impl From<Fraction> for Operand {
    fn from(value: Fraction) -> Self {
        Operand::Fraction(value)
    }
}

impl From<&Fraction> for Operand {
    fn from(value: &Fraction) -> Self {
        Operand::Fraction(value.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
