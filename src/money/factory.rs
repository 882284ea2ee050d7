// ============================================================================
// Money Factory
// Fluent construction of monetary amounts
// ============================================================================

use super::amount::Money;
use super::config::MoneyConfig;
use super::context::NumericContext;
use super::currency::{CurrencyLookup, CurrencyRegistry, CurrencyUnit};
use crate::numeric::{IntoDecimal, NumericError, NumericResult};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
enum CurrencyChoice {
    Code(String),
    Unit(CurrencyUnit),
}

/// Builder for [`Money`] with a fluent API
///
/// # Example
/// ```
/// use exact_values::prelude::*;
///
/// let price = MoneyFactory::new()
///     .set_currency("EUR")
///     .set_number("19.99")
///     .create()
///     .unwrap();
/// assert_eq!(price.to_short_string(), "€20");
/// ```
///
/// Setters never fail; a bad number or unknown currency surfaces from
/// [`MoneyFactory::create`].
#[derive(Debug, Clone)]
pub struct MoneyFactory {
    currency: Option<CurrencyChoice>,
    number: NumericResult<Decimal>,
    context: NumericContext,
}

impl MoneyFactory {
    /// Create a factory with the default context and the number zero
    pub fn new() -> Self {
        Self {
            currency: None,
            number: Ok(Decimal::ZERO),
            context: NumericContext::DEFAULT,
        }
    }

    /// Start from the configured default currency and context
    pub fn from_config(config: &MoneyConfig) -> Self {
        let factory = Self::new().set_context(config.default_context);
        match &config.default_currency {
            Some(code) => factory.set_currency(code.clone()),
            None => factory,
        }
    }

    /// Set currency by code or symbol, resolved through the global registry
    pub fn set_currency(mut self, code: impl Into<String>) -> Self {
        self.currency = Some(CurrencyChoice::Code(code.into()));
        self
    }

    /// Set an already resolved currency
    pub fn set_currency_unit(mut self, unit: CurrencyUnit) -> Self {
        self.currency = Some(CurrencyChoice::Unit(unit));
        self
    }

    /// Set the number, widening the context when the value needs more
    /// fractional or significant digits than it allows
    pub fn set_number(mut self, value: impl IntoDecimal) -> Self {
        self.number = value.into_decimal();
        if let Ok(number) = &self.number {
            self.context = self.context.widened_for(number);
        }
        self
    }

    /// Set the context; replaces any widening done by `set_number`
    pub fn set_context(mut self, context: NumericContext) -> Self {
        self.context = context;
        self
    }

    pub fn context(&self) -> NumericContext {
        self.context
    }

    pub fn default_context(&self) -> NumericContext {
        NumericContext::DEFAULT
    }

    pub fn maximal_context(&self) -> NumericContext {
        NumericContext::MAXIMAL
    }

    fn parts(&self) -> NumericResult<(Decimal, CurrencyUnit)> {
        let number = self.number.clone()?;
        let currency = match &self.currency {
            Some(CurrencyChoice::Unit(unit)) => unit.clone(),
            Some(CurrencyChoice::Code(code)) => CurrencyRegistry::global().resolve(code)?,
            None => return Err(NumericError::MissingCurrency),
        };
        Ok((number, currency))
    }

    /// Build the amount, failing on precision loss
    ///
    /// # Errors
    /// `MissingCurrency`, `UnknownCurrency`, `Parse`, `PrecisionLoss`
    pub fn create(&self) -> NumericResult<Money> {
        let (number, currency) = self.parts()?;
        Money::strict(number, currency, self.context)
    }

    /// Build the amount, rounding into the context
    pub fn create_rounded(&self) -> NumericResult<Money> {
        let (number, currency) = self.parts()?;
        Money::lossy(number, currency, self.context)
    }
}

impl Default for MoneyFactory {
    fn default() -> Self {
        Self::new()
    }
}
