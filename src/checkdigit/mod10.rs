// ============================================================================
// Mod10 Check Digits
// Weighted digit sums modulo 10: Luhn, EAN-style and letter-prefixed codes
// ============================================================================

use crate::interfaces::CheckDigitScheme;
use crate::numeric::{NumericError, NumericResult};
use smallvec::SmallVec;

/// Digit buffer; identifiers rarely exceed 32 digits
type Digits = SmallVec<[u32; 32]>;

/// Weighted sum modulo 10
///
/// Weights alternate starting from the rightmost payload digit
/// (`odd_weight` on positions 1, 3, 5, ... counted from the right).
/// The check digit is `(10 - sum mod 10) mod 10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mod10 {
    odd_weight: u32,
    even_weight: u32,
    cross_sum: bool,
    letter_prefix: bool,
}

impl Mod10 {
    /// Plain weighted sum, e.g. `weighted(3, 1)` for EAN/GTIN codes
    pub const fn weighted(odd_weight: u32, even_weight: u32) -> Self {
        Self {
            odd_weight,
            even_weight,
            cross_sum: false,
            letter_prefix: false,
        }
    }

    /// Luhn: weights 2/1, two-digit products contribute their digit sum
    pub const fn luhn() -> Self {
        Self::weighted(2, 1).with_cross_sum()
    }

    /// Luhn over codes that may start with a letter, A-Z read as 01-26
    pub const fn letter_prefixed() -> Self {
        Self::luhn().with_letter_prefix()
    }

    pub const fn with_cross_sum(mut self) -> Self {
        self.cross_sum = true;
        self
    }

    pub const fn with_letter_prefix(mut self) -> Self {
        self.letter_prefix = true;
        self
    }

    fn digits(&self, payload: &str) -> NumericResult<Digits> {
        let mut digits = Digits::new();
        for (i, c) in payload.chars().enumerate() {
            match c {
                '0'..='9' => digits.push(c as u32 - '0' as u32),
                'A'..='Z' | 'a'..='z' if i == 0 && self.letter_prefix => {
                    let n = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
                    digits.push(n / 10);
                    digits.push(n % 10);
                },
                ' ' => {},
                _ => return Err(NumericError::parse(payload, format!("'{}' is not a digit", c))),
            }
        }
        if digits.is_empty() {
            return Err(NumericError::parse(payload, "no digits"));
        }
        Ok(digits)
    }

    fn weigh(&self, position: usize, digit: u32) -> u32 {
        let weight = if position % 2 == 0 {
            self.odd_weight
        } else {
            self.even_weight
        };
        let product = digit * weight;
        if self.cross_sum {
            cross_sum(product)
        } else {
            product
        }
    }
}

fn cross_sum(mut n: u32) -> u32 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

impl CheckDigitScheme for Mod10 {
    fn name(&self) -> &str {
        match (self.cross_sum, self.letter_prefix) {
            (true, true) => "Mod10-Letter",
            (true, false) => "Luhn",
            _ => "Mod10",
        }
    }

    fn min_length(&self) -> usize {
        2
    }

    fn compute_check_digit(&self, payload: &str) -> NumericResult<String> {
        let sum: u32 = self
            .digits(payload)?
            .iter()
            .rev()
            .enumerate()
            .map(|(pos, &d)| self.weigh(pos, d))
            .sum();
        Ok(((10 - sum % 10) % 10).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{quickcheck, TestResult};

    #[test]
    fn test_luhn_vectors() {
        let luhn = Mod10::luhn();
        assert_eq!(luhn.compute_check_digit("123456789").unwrap(), "7");
        assert!(luhn.is_valid("1234567897"));
        assert!(!luhn.is_valid("2134567897"));
        assert!(luhn.is_valid("79927398713"));
        assert!(luhn.is_valid("4111 1111 1111 1111"));
    }

    #[test]
    fn test_ean13_weights() {
        let ean = Mod10::weighted(3, 1);
        assert_eq!(ean.compute_check_digit("400638133393").unwrap(), "1");
        assert!(ean.is_valid("4006381333931"));
        assert!(!ean.is_valid("4006381333932"));
    }

    #[test]
    fn test_weighted_four_nine() {
        let scheme = Mod10::weighted(4, 9);
        // 4*4 + 3*9 + 2*4 + 1*9 = 60
        assert_eq!(scheme.compute_check_digit("1234").unwrap(), "0");
        assert!(scheme.is_valid("12340"));
    }

    #[test]
    fn test_letter_prefix() {
        let scheme = Mod10::letter_prefixed();
        let digit = scheme.compute_check_digit("A12345").unwrap();
        assert_eq!(digit, Mod10::luhn().compute_check_digit("0112345").unwrap());
        assert!(scheme.is_valid(&format!("A12345{}", digit)));
        assert!(!scheme.is_valid(&format!("B12345{}", digit)));
        assert!(!Mod10::luhn().is_valid(&format!("A12345{}", digit)));
    }

    #[test]
    fn test_malformed_input_is_invalid() {
        let luhn = Mod10::luhn();
        assert!(!luhn.is_valid(""));
        assert!(!luhn.is_valid("7"));
        assert!(!luhn.is_valid("12a4"));
        assert!(matches!(
            luhn.compute_check_digit("12-3"),
            Err(NumericError::Parse { .. })
        ));
        assert_eq!(luhn.check_digit("1234567897"), "7");
        assert_eq!(luhn.payload("1234567897"), "123456789");
    }

    #[test]
    fn quickcheck_computed_digit_validates() {
        fn prop(raw: Vec<u8>, odd: u8, even: u8) -> TestResult {
            if raw.is_empty() {
                return TestResult::discard();
            }
            let payload: String = raw.iter().map(|d| char::from(b'0' + d % 10)).collect();
            let schemes = [
                Mod10::luhn(),
                Mod10::weighted(u32::from(odd % 10), u32::from(even % 10)),
            ];
            TestResult::from_bool(schemes.iter().all(|scheme| {
                let digit = scheme.compute_check_digit(&payload).unwrap();
                scheme.is_valid(&format!("{}{}", payload, digit))
            }))
        }
        quickcheck(prop as fn(Vec<u8>, u8, u8) -> TestResult);
    }

    #[test]
    fn quickcheck_luhn_detects_single_digit_errors() {
        fn prop(raw: Vec<u8>, index: usize, delta: u8) -> TestResult {
            let delta = u32::from(delta % 9) + 1;
            if raw.is_empty() {
                return TestResult::discard();
            }
            let mut digits: Vec<u32> = raw.iter().map(|d| u32::from(d % 10)).collect();
            let luhn = Mod10::luhn();
            let payload: String = digits.iter().map(|d| d.to_string()).collect();
            let check = luhn.compute_check_digit(&payload).unwrap();
            let i = index % digits.len();
            digits[i] = (digits[i] + delta) % 10;
            let altered: String = digits.iter().map(|d| d.to_string()).collect();
            TestResult::from_bool(!luhn.is_valid(&format!("{}{}", altered, check)))
        }
        quickcheck(prop as fn(Vec<u8>, usize, u8) -> TestResult);
    }
}
