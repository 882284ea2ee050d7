// ============================================================================
// Mod97 Check Digits
// IBAN-style two-digit checks at positions 3 and 4
// ============================================================================

use crate::interfaces::CheckDigitScheme;
use crate::numeric::{NumericError, NumericResult};

/// ISO 7064 MOD 97-10 as used by IBANs.
///
/// Whitespace is ignored, so `"DE89 3704 0044 0532 0130 00"` validates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mod97;

impl Mod97 {
    pub const fn new() -> Self {
        Mod97
    }
}

fn compact(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// `text mod 97`, reading letters A-Z as 10-35
fn remainder(text: &str, original: &str) -> NumericResult<u32> {
    text.chars().try_fold(0u32, |acc, c| match c {
        '0'..='9' => Ok((acc * 10 + (c as u32 - '0' as u32)) % 97),
        'A'..='Z' | 'a'..='z' => {
            let v = c.to_ascii_uppercase() as u32 - 'A' as u32 + 10;
            Ok((acc * 100 + v) % 97)
        },
        _ => Err(NumericError::parse(original, format!("'{}' is not alphanumeric", c))),
    })
}

impl CheckDigitScheme for Mod97 {
    fn name(&self) -> &str {
        "Mod97"
    }

    fn min_length(&self) -> usize {
        5
    }

    /// Third and fourth non-blank characters; empty if a blank splits them.
    fn check_digit<'a>(&self, value: &'a str) -> &'a str {
        let mut chars = value.char_indices().filter(|(_, c)| !c.is_whitespace()).skip(2);
        match (chars.next(), chars.next()) {
            (Some((start, first)), Some((next, second))) if next == start + first.len_utf8() => {
                &value[start..next + second.len_utf8()]
            },
            _ => "",
        }
    }

    fn payload(&self, value: &str) -> String {
        let compact = compact(value);
        match (compact.get(..2), compact.get(4..)) {
            (Some(country), Some(rest)) => format!("{}{}", country, rest),
            _ => compact,
        }
    }

    /// Insert `00` after the country code, move the first four characters
    /// to the end and return `98 - n mod 97`, zero-padded to two digits.
    fn compute_check_digit(&self, payload: &str) -> NumericResult<String> {
        let compact = compact(payload);
        let (country, rest) = match (compact.get(..2), compact.get(2..)) {
            (Some(country), Some(rest)) if !rest.is_empty() => (country, rest),
            _ => return Err(NumericError::parse(payload, "too short")),
        };
        let rearranged = format!("{}{}00", rest, country);
        let n = remainder(&rearranged, payload)?;
        Ok(format!("{:02}", 98 - n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{quickcheck, TestResult};

    #[test]
    fn test_iban_vectors() {
        let scheme = Mod97::new();
        assert!(scheme.is_valid("DE89370400440532013000"));
        assert!(scheme.is_valid("GB82WEST12345698765432"));
        assert!(scheme.is_valid("DE89 3704 0044 0532 0130 00"));
        assert!(!scheme.is_valid("DE88370400440532013000"));
        assert!(!scheme.is_valid("DE89370400440532013001"));
    }

    #[test]
    fn test_parts() {
        let scheme = Mod97::new();
        assert_eq!(scheme.check_digit("DE89370400440532013000"), "89");
        assert_eq!(scheme.payload("DE89370400440532013000"), "DE370400440532013000");
        assert_eq!(
            scheme.compute_check_digit("DE370400440532013000").unwrap(),
            "89"
        );
    }

    #[test]
    fn test_blanks_around_check_digits() {
        let scheme = Mod97::new();
        assert_eq!(scheme.check_digit("DE 89 3704 0044 0532 0130 00"), "89");
        assert!(scheme.is_valid("DE 89 3704 0044 0532 0130 00"));
        assert!(scheme.is_valid(" GB 82 WEST 1234 5698 7654 32"));
        assert!(!scheme.is_valid("DE 88 3704 0044 0532 0130 00"));
        assert_eq!(scheme.check_digit("DE 8 9 3704"), "");
    }

    #[test]
    fn test_malformed_input() {
        let scheme = Mod97::new();
        assert!(!scheme.is_valid("DE8"));
        assert!(!scheme.is_valid("DE89-3704"));
        assert!(scheme.compute_check_digit("D").is_err());
        assert!(matches!(
            scheme.compute_check_digit("DE12_4"),
            Err(NumericError::Parse { .. })
        ));
    }

    #[test]
    fn quickcheck_computed_digits_validate() {
        fn prop(country: (u8, u8), raw: Vec<u8>) -> TestResult {
            if raw.is_empty() {
                return TestResult::discard();
            }
            let letter = |b: u8| char::from(b'A' + b % 26);
            let account: String = raw.iter().map(|d| char::from(b'0' + d % 10)).collect();
            let scheme = Mod97::new();
            let payload = format!("{}{}{}", letter(country.0), letter(country.1), account);
            let digits = scheme.compute_check_digit(&payload).unwrap();
            let iban = format!("{}{}{}", &payload[..2], digits, account);
            TestResult::from_bool(scheme.is_valid(&iban))
        }
        quickcheck(prop as fn((u8, u8), Vec<u8>) -> TestResult);
    }
}
