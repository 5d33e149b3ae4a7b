//! Currency types and currency pairs

use crate::error::{ConverterError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported currencies (ISO 4217 codes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
    /// US Dollar
    USD,
    /// Euro
    EUR,
    /// British Pound
    GBP,
    /// Japanese Yen
    JPY,
    /// Canadian Dollar
    CAD,
    /// Australian Dollar
    AUD,
    /// Swiss Franc
    CHF,
    /// Chinese Yuan
    CNY,
    /// Indian Rupee
    INR,
    /// Brazilian Real
    BRL,
}

impl Currency {
    /// Every supported currency, in display order
    pub const ALL: [Currency; 10] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::JPY,
        Currency::CAD,
        Currency::AUD,
        Currency::CHF,
        Currency::CNY,
        Currency::INR,
        Currency::BRL,
    ];

    /// Get ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::CHF => "CHF",
            Currency::CNY => "CNY",
            Currency::INR => "INR",
            Currency::BRL => "BRL",
        }
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            Currency::USD => "US Dollar",
            Currency::EUR => "Euro",
            Currency::GBP => "British Pound",
            Currency::JPY => "Japanese Yen",
            Currency::CAD => "Canadian Dollar",
            Currency::AUD => "Australian Dollar",
            Currency::CHF => "Swiss Franc",
            Currency::CNY => "Chinese Yuan",
            Currency::INR => "Indian Rupee",
            Currency::BRL => "Brazilian Real",
        }
    }

    /// Get currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::CAD => "C$",
            Currency::AUD => "A$",
            Currency::CHF => "Fr",
            Currency::CNY => "¥",
            Currency::INR => "₹",
            Currency::BRL => "R$",
        }
    }

    /// Parse from ISO code, ignoring case
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(code))
    }

    /// Label used by currency pickers, e.g. `$ USD - US Dollar`
    pub fn label(&self) -> String {
        format!("{} {} - {}", self.symbol(), self.code(), self.name())
    }
}

impl FromStr for Currency {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s).ok_or_else(|| ConverterError::UnknownCurrency(s.to_string()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Ordered currency pair: 1 `base` buys `rate` units of `quote`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: Currency,
    pub quote: Currency,
}

impl CurrencyPair {
    /// Create new currency pair
    pub fn new(base: Currency, quote: Currency) -> Self {
        Self { base, quote }
    }

    /// Get the inverse pair
    pub fn inverse(&self) -> Self {
        Self {
            base: self.quote,
            quote: self.base,
        }
    }

    /// Both sides name the same currency
    pub fn is_identity(&self) -> bool {
        self.base == self.quote
    }

    /// Table key, e.g. `USD-EUR`
    pub fn key(&self) -> String {
        format!("{}-{}", self.base, self.quote)
    }

    /// Parse a table key (`USD-EUR`)
    pub fn from_key(key: &str) -> Result<Self> {
        let (base, quote) = key
            .trim()
            .split_once('-')
            .ok_or_else(|| ConverterError::InvalidPair(key.to_string()))?;
        Ok(Self {
            base: base.parse()?,
            quote: quote.parse()?,
        })
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base, self.quote)
    }
}
