// ============================================================================
// Money Formatting and Parsing
// Text forms "<decimal> <currency>" and "<currency> <decimal>"
// ============================================================================

use super::amount::Money;
use super::config::MoneyConfig;
use super::context::NumericContext;
use super::currency::{CurrencyLookup, CurrencyRegistry, CurrencyUnit};
use crate::numeric::{parse_decimal, NumericError, NumericResult};
use std::fmt;
use std::str::FromStr;

impl Money {
    /// Value rounded HALF_UP to the currency's fraction digits, then the code.
    ///
    /// ```
    /// use exact_values::Money;
    /// let m = Money::of(10, "EUR").unwrap().divide(3).unwrap();
    /// assert_eq!(m.to_display_string(), "3.33 EUR");
    /// ```
    pub fn to_display_string(&self) -> String {
        format!("{} {}", self.display_value(), self.currency_code())
    }

    /// Symbol followed by the value rounded HALF_UP to whole units; a minus
    /// sign goes in front of the symbol (`"-£3"`).
    pub fn to_short_string(&self) -> String {
        let whole = self.rounded_to(0);
        let sign = if whole.is_sign_negative() && !whole.is_zero() { "-" } else { "" };
        format!("{}{}{}", sign, self.currency().symbol(), whole.abs())
    }
}

/// Exact value and currency code, e.g. `"3.3333 EUR"`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number(), self.currency_code())
    }
}

/// Parses through the global currency registry, without a default currency.
impl FromStr for Money {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoneyParser::global().parse(s)
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Reads money text with a leading or trailing currency token.
///
/// The decimal separator is guessed from the digit grouping:
/// - with both `.` and `,` present, the later one is the decimal separator
/// - a single `,` not followed by exactly three digits is a decimal comma
/// - repeated `,` or repeated `.` are grouping separators
/// - a single `.` is a decimal point
///
/// So `"1.234,56 EUR"`, `"EUR 1,234.56"` and `"19,99 €"` all parse, while
/// `"1,000 USD"` is one thousand.
pub struct MoneyParser<'a> {
    lookup: &'a dyn CurrencyLookup,
    default_currency: Option<String>,
    context: NumericContext,
}

impl<'a> MoneyParser<'a> {
    pub fn new(lookup: &'a dyn CurrencyLookup) -> Self {
        Self {
            lookup,
            default_currency: None,
            context: NumericContext::DEFAULT,
        }
    }

    /// Currency used when the text names none.
    pub fn with_default_currency(mut self, code: impl Into<String>) -> Self {
        self.default_currency = Some(code.into());
        self
    }

    /// Base context; it is widened to fit every parsed literal.
    pub fn with_context(mut self, context: NumericContext) -> Self {
        self.context = context;
        self
    }

    pub fn parse(&self, text: &str) -> NumericResult<Money> {
        let (token, number) = split_currency(text)?;
        let currency = self.currency_for(text, token)?;
        let normalized = normalize_separators(number)
            .ok_or_else(|| NumericError::parse(text, "ambiguous decimal separators"))?;
        let value = parse_decimal(&normalized).map_err(|_| NumericError::parse(text, "malformed amount"))?;
        Money::strict(value, currency, self.context.widened_for(&value))
    }

    fn currency_for(&self, text: &str, token: &str) -> NumericResult<CurrencyUnit> {
        if !token.is_empty() {
            return self.lookup.resolve(token);
        }
        match &self.default_currency {
            Some(code) => {
                tracing::debug!(text, currency = %code, "no currency in text, using default");
                self.lookup.resolve(code)
            },
            None => Err(NumericError::MissingCurrency),
        }
    }
}

impl MoneyParser<'static> {
    /// Parser over [`CurrencyRegistry::global`].
    pub fn global() -> Self {
        Self::new(CurrencyRegistry::global())
    }

    /// Global parser using the configured default currency and context.
    pub fn from_config(config: &MoneyConfig) -> Self {
        let parser = Self::global().with_context(config.default_context);
        match &config.default_currency {
            Some(code) => parser.with_default_currency(code.clone()),
            None => parser,
        }
    }
}

fn is_currency_char(c: char) -> bool {
    !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | ','))
}

/// Split into `(currency token, numeric run)`, both trimmed.
fn split_currency(text: &str) -> NumericResult<(&str, &str)> {
    let trimmed = text.trim();
    let number_start = trimmed
        .find(|c: char| !is_currency_char(c))
        .ok_or_else(|| NumericError::parse(text, "no amount"))?;
    let number_end = trimmed
        .rfind(|c: char| !is_currency_char(c))
        .map(|i| i + 1)
        .unwrap_or(trimmed.len());

    let leading = trimmed[..number_start].trim();
    let trailing = trimmed[number_end..].trim();
    let number = trimmed[number_start..number_end].trim();

    match (leading.is_empty(), trailing.is_empty()) {
        (false, false) => Err(NumericError::parse(text, "currency given twice")),
        (false, true) => Ok((leading, number)),
        _ => Ok((trailing, number)),
    }
}

/// Rewrite the numeric run with `.` as the only decimal separator.
fn normalize_separators(number: &str) -> Option<String> {
    let dots = number.matches('.').count();
    let commas = number.matches(',').count();

    let (decimal, grouping) = match (dots, commas) {
        (0, 0) => return Some(number.to_string()),
        (_, 0) if dots > 1 => (None, '.'),
        (_, 0) => (Some('.'), ','),
        (0, 1) => {
            let after = number.rsplit(',').next().unwrap_or("");
            if after.len() == 3 && after.chars().all(|c| c.is_ascii_digit()) {
                (None, ',')
            } else {
                (Some(','), '.')
            }
        },
        (0, _) => (None, ','),
        _ => {
            let last_dot = number.rfind('.');
            let last_comma = number.rfind(',');
            if last_comma > last_dot {
                (Some(','), '.')
            } else {
                (Some('.'), ',')
            }
        },
    };

    if let Some(sep) = decimal {
        if number.matches(sep).count() > 1 {
            return None;
        }
    }

    Some(
        number
            .chars()
            .filter(|&c| c != grouping)
            .map(|c| if Some(c) == decimal { '.' } else { c })
            .collect(),
    )
}
