// ============================================================================
// Money Configuration
// Crate-level defaults for parsing, construction and interning
// ============================================================================

use super::context::NumericContext;
use super::currency::{CurrencyLookup, CurrencyRegistry};
use crate::numeric::{intern_cache, DEFAULT_INTERN_CAPACITY};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Defaults shared by [`MoneyParser`](super::MoneyParser) and
/// [`MoneyFactory`](super::MoneyFactory)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MoneyConfig {
    /// Currency assumed when money text names none
    /// None means such text is rejected with `MissingCurrency`
    pub default_currency: Option<String>,

    /// Context used by factories and as the parser's base context
    pub default_context: NumericContext,

    /// Maximum number of interned packed decimals
    pub intern_capacity: usize,
}

impl MoneyConfig {
    pub fn new() -> Self {
        Self {
            default_currency: None,
            default_context: NumericContext::DEFAULT,
            intern_capacity: DEFAULT_INTERN_CAPACITY,
        }
    }

    /// Builder method: Set default currency
    pub fn with_default_currency(mut self, code: impl Into<String>) -> Self {
        self.default_currency = Some(code.into());
        self
    }

    /// Builder method: Set default numeric context
    pub fn with_default_context(mut self, context: NumericContext) -> Self {
        self.default_context = context;
        self
    }

    /// Builder method: Set intern cache capacity
    pub fn with_intern_capacity(mut self, capacity: usize) -> Self {
        self.intern_capacity = capacity;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Some(code) = &self.default_currency {
            if code.trim().is_empty() {
                return Err("Default currency cannot be empty".to_string());
            }
            if CurrencyRegistry::global().lookup(code).is_none() {
                return Err(format!("Default currency {} is not registered", code));
            }
        }

        self.default_context.validate()
    }

    /// Push process-wide settings (the intern cache bound) into effect.
    pub fn apply(&self) {
        tracing::debug!(capacity = self.intern_capacity, "applying money configuration");
        intern_cache().set_capacity(self.intern_capacity);
    }

    /// Read a configuration from JSON; missing fields take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(json).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for MoneyConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Preset Configurations
// ============================================================================

impl MoneyConfig {
    /// Euro amounts, German-style text without a currency parses as EUR
    pub fn euro() -> Self {
        Self::new().with_default_currency("EUR")
    }

    /// US dollar amounts
    pub fn us_dollar() -> Self {
        Self::new().with_default_currency("USD")
    }
}
