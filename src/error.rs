//! Error types for the currency converter

use crate::currency::Currency;
use thiserror::Error;

/// Main error type for the currency converter
#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Invalid currency pair: {0}")]
    InvalidPair(String),

    #[error("Invalid rate for {pair}: {rate} (rates must be positive and finite)")]
    InvalidRate { pair: String, rate: f64 },

    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("No rate available for {from}-{to}")]
    MissingRate { from: Currency, to: Currency },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result type alias for converter operations
pub type Result<T> = std::result::Result<T, ConverterError>;
