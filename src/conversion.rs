//! Amount validation, conversion and display rounding

use crate::currency::Currency;
use crate::error::{ConverterError, Result};
use crate::fx::{RateLookup, RateResolver, ResolutionPath};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction digits of a displayed converted amount
pub const AMOUNT_DECIMALS: u32 = 2;

/// Fraction digits of a displayed effective rate
pub const RATE_DECIMALS: u32 = 4;

/// Round half-up to `places` fraction digits
///
/// Amounts and rates are non-negative, where half-up and half-away-from-zero
/// agree. Values too large to scale have no fraction digits left and are
/// returned unchanged.
pub fn round_half_up(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Render with exactly `places` fraction digits, rounding half-up first
pub fn format_fixed(value: f64, places: u32) -> String {
    format!("{:.*}", places as usize, round_half_up(value, places))
}

/// Parse user-entered amount text
///
/// Accepts any finite, non-negative number after trimming whitespace.
pub fn parse_amount(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let amount: f64 = trimmed
        .parse()
        .map_err(|_| ConverterError::InvalidAmount(text.to_string()))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(ConverterError::InvalidAmount(text.to_string()));
    }
    // fold -0 into 0
    Ok(amount + 0.0)
}

/// One conversion to perform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Amount as entered, echoed back in summaries
    pub amount_text: String,
    pub amount: f64,
    pub from: Currency,
    pub to: Currency,
}

impl ConversionRequest {
    /// Build from a numeric amount
    pub fn new(amount: f64, from: Currency, to: Currency) -> Result<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ConverterError::InvalidAmount(amount.to_string()));
        }
        Ok(Self {
            amount_text: amount.to_string(),
            amount: amount + 0.0,
            from,
            to,
        })
    }

    /// Build from amount text as typed by the user
    pub fn parse(amount_text: &str, from: Currency, to: Currency) -> Result<Self> {
        let amount = parse_amount(amount_text)?;
        Ok(Self {
            amount_text: amount_text.trim().to_string(),
            amount,
            from,
            to,
        })
    }
}

/// Outcome of one conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub request: ConversionRequest,
    /// Rounded to [`AMOUNT_DECIMALS`]
    pub converted_amount: f64,
    pub effective_rate: f64,
    pub path: ResolutionPath,
}

impl ConversionResult {
    /// Converted amount with two fraction digits, e.g. `118.00`
    pub fn converted_display(&self) -> String {
        format_fixed(self.converted_amount, AMOUNT_DECIMALS)
    }

    /// Effective rate with four fraction digits, e.g. `1.1800`
    pub fn rate_display(&self) -> String {
        format_fixed(self.effective_rate, RATE_DECIMALS)
    }

    /// `100 EUR = 118.00 USD`
    pub fn summary(&self) -> String {
        format!(
            "{} {} = {} {}",
            self.request.amount_text,
            self.request.from,
            self.converted_display(),
            self.request.to
        )
    }

    /// `1 EUR = 1.1800 USD`
    pub fn rate_summary(&self) -> String {
        format!(
            "1 {} = {} {}",
            self.request.from,
            self.rate_display(),
            self.request.to
        )
    }

    /// Mirror of this result after the currencies are swapped
    ///
    /// The displayed converted amount becomes the input and the original input
    /// becomes the displayed output. Nothing is recomputed, so the pair is only
    /// an approximate inverse of the original conversion.
    pub fn swapped(&self) -> ConversionResult {
        let path = match self.path {
            ResolutionPath::Identity => ResolutionPath::Identity,
            _ => ResolutionPath::Inverse,
        };
        ConversionResult {
            request: ConversionRequest {
                amount_text: self.converted_display(),
                amount: self.converted_amount,
                from: self.request.to,
                to: self.request.from,
            },
            converted_amount: self.request.amount,
            effective_rate: 1.0 / self.effective_rate,
            path,
        }
    }
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

/// Convert a request with the given resolver
///
/// # Example
/// ```
/// use currency_converter::conversion::{convert, ConversionRequest};
/// use currency_converter::currency::Currency;
/// use currency_converter::fx::{RateResolver, RateTable};
///
/// let resolver = RateResolver::new(RateTable::reference());
/// let request = ConversionRequest::parse("100", Currency::EUR, Currency::USD).unwrap();
/// let result = convert(&resolver, &request).unwrap();
/// assert_eq!(result.converted_display(), "118.00");
/// assert_eq!(result.summary(), "100 EUR = 118.00 USD");
/// ```
pub fn convert<L: RateLookup>(
    resolver: &RateResolver<L>,
    request: &ConversionRequest,
) -> Result<ConversionResult> {
    let resolution = resolver.resolve(request.from, request.to)?;
    let converted = round_half_up(request.amount * resolution.rate, AMOUNT_DECIMALS);
    if !converted.is_finite() {
        return Err(ConverterError::InvalidAmount(request.amount_text.clone()));
    }

    Ok(ConversionResult {
        request: request.clone(),
        converted_amount: converted,
        effective_rate: resolution.rate,
        path: resolution.path,
    })
}
