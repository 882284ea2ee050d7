// ============================================================================
// Currency Units
// Narrow lookup contract for currency codes and symbols
// ============================================================================

use crate::numeric::{NumericError, NumericResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// What the money core needs to know about a currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyUnit {
    code: Arc<str>,
    fraction_digits: u32,
    symbol: Arc<str>,
}

impl CurrencyUnit {
    pub fn new(code: &str, fraction_digits: u32, symbol: &str) -> Self {
        Self {
            code: Arc::from(code.to_ascii_uppercase()),
            fraction_digits,
            symbol: Arc::from(symbol),
        }
    }

    /// Currency code, e.g. `"EUR"`.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Natural number of fractional digits, e.g. 2 for EUR, 0 for JPY.
    pub fn fraction_digits(&self) -> u32 {
        self.fraction_digits
    }

    /// Display symbol, e.g. `"€"`.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl fmt::Display for CurrencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// Resolves a currency code or symbol to its unit.
pub trait CurrencyLookup: Send + Sync {
    fn lookup(&self, code_or_symbol: &str) -> Option<CurrencyUnit>;

    /// Like `lookup`, failing with `UnknownCurrency`.
    fn resolve(&self, code_or_symbol: &str) -> NumericResult<CurrencyUnit> {
        self.lookup(code_or_symbol)
            .ok_or_else(|| NumericError::UnknownCurrency(code_or_symbol.to_string()))
    }
}

#[derive(Default)]
struct Units {
    by_code: HashMap<String, CurrencyUnit>,
    by_symbol: HashMap<String, String>,
}

/// Explicitly populated currency table.
///
/// Codes are matched case-insensitively, symbols exactly. When two units
/// share a symbol the first registration keeps it.
#[derive(Default)]
pub struct CurrencyRegistry {
    units: RwLock<Units>,
}

static GLOBAL: OnceLock<CurrencyRegistry> = OnceLock::new();

impl CurrencyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with a few well-known units (EUR, USD, GBP, CHF, JPY).
    pub fn with_common() -> Self {
        let registry = Self::new();
        registry.register(CurrencyUnit::new("EUR", 2, "€"));
        registry.register(CurrencyUnit::new("USD", 2, "$"));
        registry.register(CurrencyUnit::new("GBP", 2, "£"));
        registry.register(CurrencyUnit::new("CHF", 2, "CHF"));
        registry.register(CurrencyUnit::new("JPY", 0, "¥"));
        registry
    }

    /// Process-wide registry used by the convenience constructors.
    pub fn global() -> &'static CurrencyRegistry {
        GLOBAL.get_or_init(Self::with_common)
    }

    pub fn register(&self, unit: CurrencyUnit) {
        tracing::debug!(code = unit.code(), symbol = unit.symbol(), "registering currency");
        let mut units = self.units.write();
        units
            .by_symbol
            .entry(unit.symbol().to_string())
            .or_insert_with(|| unit.code().to_string());
        units.by_code.insert(unit.code().to_string(), unit);
    }

    pub fn len(&self) -> usize {
        self.units.read().by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.read().by_code.is_empty()
    }
}

impl CurrencyLookup for CurrencyRegistry {
    fn lookup(&self, code_or_symbol: &str) -> Option<CurrencyUnit> {
        let key = code_or_symbol.trim();
        let units = self.units.read();
        if let Some(unit) = units.by_code.get(&key.to_ascii_uppercase()) {
            return Some(unit.clone());
        }
        units
            .by_symbol
            .get(key)
            .and_then(|code| units.by_code.get(code))
            .cloned()
    }
}

/// Resolve through the global registry.
pub(crate) fn resolve_global(code_or_symbol: &str) -> NumericResult<CurrencyUnit> {
    CurrencyRegistry::global().resolve(code_or_symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_code_and_symbol() {
        let registry = CurrencyRegistry::with_common();
        let eur = registry.lookup("EUR").unwrap();
        assert_eq!(eur.fraction_digits(), 2);
        assert_eq!(eur.symbol(), "€");
        assert_eq!(registry.lookup("eur"), Some(eur.clone()));
        assert_eq!(registry.lookup("€"), Some(eur));
        assert_eq!(registry.lookup("¥").unwrap().fraction_digits(), 0);
    }

    #[test]
    fn test_unknown_currency() {
        let registry = CurrencyRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(
            registry.resolve("XYZ"),
            Err(NumericError::UnknownCurrency("XYZ".to_string()))
        );
    }

    #[test]
    fn test_first_symbol_registration_wins() {
        let registry = CurrencyRegistry::new();
        registry.register(CurrencyUnit::new("USD", 2, "$"));
        registry.register(CurrencyUnit::new("CAD", 2, "$"));
        assert_eq!(registry.lookup("$").unwrap().code(), "USD");
        assert_eq!(registry.lookup("CAD").unwrap().code(), "CAD");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_global_registry_is_seeded() {
        assert!(CurrencyRegistry::global().lookup("USD").is_some());
        assert_eq!(resolve_global("£").unwrap().code(), "GBP");
    }
}
