//! Immutable exchange-rate table
//!
//! Rates are stored per ordered pair: `USD-EUR = 0.85` means 1 USD buys 0.85 EUR.
//! The table is sparse; neither every pair nor both directions of a pair
//! need to be present. Once built, a table is never mutated.

use super::base::RateLookup;
use crate::currency::{Currency, CurrencyPair};
use crate::error::{ConverterError, Result};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reference rates, anchored to USD
const REFERENCE_RATES: [(Currency, Currency, f64); 18] = [
    (Currency::USD, Currency::EUR, 0.85),
    (Currency::USD, Currency::GBP, 0.73),
    (Currency::USD, Currency::JPY, 110.0),
    (Currency::USD, Currency::CAD, 1.25),
    (Currency::USD, Currency::AUD, 1.35),
    (Currency::USD, Currency::CHF, 0.92),
    (Currency::USD, Currency::CNY, 6.45),
    (Currency::USD, Currency::INR, 74.5),
    (Currency::USD, Currency::BRL, 5.2),
    (Currency::EUR, Currency::USD, 1.18),
    (Currency::GBP, Currency::USD, 1.37),
    (Currency::JPY, Currency::USD, 0.0091),
    (Currency::CAD, Currency::USD, 0.80),
    (Currency::AUD, Currency::USD, 0.74),
    (Currency::CHF, Currency::USD, 1.09),
    (Currency::CNY, Currency::USD, 0.155),
    (Currency::INR, Currency::USD, 0.0134),
    (Currency::BRL, Currency::USD, 0.192),
];

/// A single tabulated rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub from: Currency,
    pub to: Currency,
    pub rate: f64,
}

impl RateEntry {
    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.from, self.to)
    }
}

/// Immutable rate table
///
/// # Example
/// ```
/// use currency_converter::currency::Currency;
/// use currency_converter::fx::{RateLookup, RateTable};
///
/// let table = RateTable::reference();
/// assert_eq!(table.direct_rate(Currency::USD, Currency::EUR), Some(0.85));
/// assert_eq!(table.direct_rate(Currency::EUR, Currency::GBP), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<CurrencyPair, f64>,
}

impl RateTable {
    /// The built-in reference table
    pub fn reference() -> Self {
        let rates = REFERENCE_RATES
            .iter()
            .map(|&(from, to, rate)| (CurrencyPair::new(from, to), rate))
            .collect();
        Self { rates }
    }

    /// Start building a custom table
    pub fn builder() -> RateTableBuilder {
        RateTableBuilder::new()
    }

    /// Build a table from CSV text (`from,to,rate`)
    pub fn from_csv(csv_data: &str) -> Result<Self> {
        let mut builder = RateTableBuilder::new();
        builder.load_from_csv(csv_data)?;
        Ok(builder.build())
    }

    /// Build a table from a CSV file
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let table = Self::from_csv(&contents)?;
        log::debug!("Loaded {} rates from {}", table.len(), path.display());
        Ok(table)
    }

    /// Look up by key (`USD-EUR`)
    pub fn get_by_key(&self, key: &str) -> Result<Option<f64>> {
        let pair = CurrencyPair::from_key(key)?;
        Ok(self.rates.get(&pair).copied())
    }

    /// Number of tabulated pairs
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// All entries, ordered by (from, to)
    pub fn entries(&self) -> Vec<RateEntry> {
        let mut entries: Vec<RateEntry> = self
            .rates
            .iter()
            .map(|(pair, &rate)| RateEntry {
                from: pair.base,
                to: pair.quote,
                rate,
            })
            .collect();
        entries.sort_by_key(|e| e.pair());
        entries
    }
}

impl RateLookup for RateTable {
    fn direct_rate(&self, from: Currency, to: Currency) -> Option<f64> {
        self.rates.get(&CurrencyPair::new(from, to)).copied()
    }
}

/// Collects validated entries for a [`RateTable`]
#[derive(Debug, Default)]
pub struct RateTableBuilder {
    rates: HashMap<CurrencyPair, f64>,
}

impl RateTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the reference rates
    pub fn from_reference() -> Self {
        Self {
            rates: RateTable::reference().rates,
        }
    }

    /// Add a single rate, replacing any previous value for the pair
    pub fn add_rate(&mut self, from: Currency, to: Currency, rate: f64) -> Result<&mut Self> {
        let pair = CurrencyPair::new(from, to);
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ConverterError::InvalidRate {
                pair: pair.key(),
                rate,
            });
        }
        self.rates.insert(pair, rate);
        Ok(self)
    }

    /// Add multiple rates; stops at the first invalid one
    pub fn add_rates(&mut self, entries: &[RateEntry]) -> Result<&mut Self> {
        for entry in entries {
            self.add_rate(entry.from, entry.to, entry.rate)?;
        }
        Ok(self)
    }

    /// Load rates from CSV data
    ///
    /// Expected format: `from,to,rate`. A leading `from,to,rate` header,
    /// blank lines and `#` comments are skipped.
    pub fn load_from_csv(&mut self, csv_data: &str) -> Result<usize> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let mut entries = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(index as u64 + 1);

            if index == 0 && record.get(0).is_some_and(|f| f.eq_ignore_ascii_case("from")) {
                continue;
            }
            if record.len() != 3 {
                return Err(ConverterError::ParseError(format!(
                    "Invalid CSV format at line {}: expected 3 columns, got {}",
                    line,
                    record.len()
                )));
            }

            let from: Currency = record[0].parse()?;
            let to: Currency = record[1].parse()?;
            let rate: f64 = record[2].parse().map_err(|e| {
                ConverterError::ParseError(format!("Invalid rate at line {}: {}", line, e))
            })?;
            entries.push(RateEntry { from, to, rate });
        }

        self.add_rates(&entries)?;
        Ok(entries.len())
    }

    pub fn build(self) -> RateTable {
        RateTable { rates: self.rates }
    }
}
