// ============================================================================
// Money Module
// Currency-aware amounts with explicit precision and rounding
// ============================================================================
//
// This module provides:
// - NumericContext: precision, maximum scale and rounding mode
// - Money: exact value + currency + context, strict and lossy construction
// - MoneyFactory: fluent builder for amounts
// - MoneyParser: text forms with a separator heuristic
// - CurrencyUnit / CurrencyLookup / CurrencyRegistry: the currency collaborator
// - MoneyConfig: crate-level defaults

mod amount;
mod config;
mod context;
mod currency;
mod factory;
mod format;

pub use amount::{Money, DIVISION_SCALE};
pub use config::MoneyConfig;
pub use context::NumericContext;
pub use currency::{CurrencyLookup, CurrencyRegistry, CurrencyUnit};
pub use factory::MoneyFactory;
pub use format::MoneyParser;
