//! Prices and how they are printed.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A price with exactly two decimal places, stored as a whole number of cents
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price {
    cents: i64,
}

/// Returned when a price string isn't a decimal number that fits in cents
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("`{0}` is not a valid price")]
pub struct InvalidPrice(pub String);

impl Price {
    /// Create a price from a whole number of cents
    pub fn from_cents(cents: i64) -> Price {
        Price { cents }
    }

    /// Create a price from a float, rounding half away from zero to the nearest cent.
    /// Returns [None] for non-finite values and for values too large to count in cents
    pub fn from_f64(value: f64) -> Option<Price> {
        let cents = (value * 100.0).round();
        if !cents.is_finite() || cents.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Price {
            cents: cents as i64,
        })
    }

    pub fn cents(&self) -> i64 {
        self.cents
    }

    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }
}

impl FromStr for Price {
    type Err = InvalidPrice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<f64>()
            .ok()
            .and_then(Price::from_f64)
            .ok_or_else(|| InvalidPrice(s.to_string()))
    }
}

/// Always two decimals, no grouping
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

/// How a currency's symbol is printed next to an amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyInfo {
    pub symbol: String,
    pub symbol_on_right: bool,
}

impl CurrencyInfo {
    pub fn new<S: ToString>(symbol: S, symbol_on_right: bool) -> CurrencyInfo {
        CurrencyInfo {
            symbol: symbol.to_string(),
            symbol_on_right,
        }
    }
}

impl Default for CurrencyInfo {
    fn default() -> Self {
        CurrencyInfo::new("$", false)
    }
}

/// Render a price with its currency symbol, e.g. `$5.00` or `5.00€`
pub fn format_price(price: Price, currency: &CurrencyInfo) -> String {
    if currency.symbol_on_right {
        format!("{price}{}", currency.symbol)
    } else {
        format!("{}{price}", currency.symbol)
    }
}

/// Source of currency symbols, keyed by ISO currency code
pub trait CurrencyLookup {
    fn lookup(&self, code: &str) -> Option<CurrencyInfo>;
}

/// An in-memory table of currencies
#[derive(Debug, Default, Clone)]
pub struct CurrencyTable {
    entries: HashMap<String, CurrencyInfo>,
}

impl CurrencyTable {
    /// An empty table; every lookup falls back to the default currency
    pub fn new() -> CurrencyTable {
        CurrencyTable::default()
    }

    /// A table pre-populated with commonly used currencies
    pub fn common() -> CurrencyTable {
        let mut table = CurrencyTable::new();
        table
            .insert("USD", CurrencyInfo::new("$", false))
            .insert("CAD", CurrencyInfo::new("$", false))
            .insert("AUD", CurrencyInfo::new("$", false))
            .insert("GBP", CurrencyInfo::new("£", false))
            .insert("JPY", CurrencyInfo::new("¥", false))
            .insert("INR", CurrencyInfo::new("₹", false))
            .insert("EUR", CurrencyInfo::new("€", true))
            .insert("CHF", CurrencyInfo::new("CHF", false))
            .insert("SEK", CurrencyInfo::new("kr", true));
        table
    }

    /// Add or replace a currency, modifying `self`
    pub fn insert<S: ToString>(&mut self, code: S, info: CurrencyInfo) -> &mut Self {
        self.entries
            .insert(code.to_string().to_ascii_uppercase(), info);
        self
    }
}

impl CurrencyLookup for CurrencyTable {
    fn lookup(&self, code: &str) -> Option<CurrencyInfo> {
        self.entries.get(&code.trim().to_ascii_uppercase()).cloned()
    }
}

/// Look up a currency code, falling back to `$` on the left when it's unknown
pub fn resolve_currency<L: CurrencyLookup + ?Sized>(lookup: &L, code: &str) -> CurrencyInfo {
    match lookup.lookup(code) {
        Some(info) => info,
        None => {
            log::warn!("unknown currency `{code}`, using the default symbol");
            CurrencyInfo::default()
        }
    }
}
