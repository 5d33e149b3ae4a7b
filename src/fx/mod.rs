//! Exchange-rate tables and rate resolution
//!
//! # Components
//!
//! - **base**: the [`RateLookup`] trait over tabulated rates
//! - **table**: immutable [`RateTable`] with the built-in reference data
//! - **resolver**: [`RateResolver`] applying direct, inverse and pivot fallbacks
//!
//! # Example
//!
//! ```rust
//! use currency_converter::currency::Currency;
//! use currency_converter::fx::{RateResolver, RateTable, ResolutionPath};
//!
//! let resolver = RateResolver::new(RateTable::reference());
//!
//! // Tabulated directly
//! assert_eq!(resolver.rate(Currency::EUR, Currency::USD).unwrap(), 1.18);
//!
//! // GBP -> JPY goes through USD: 1.37 * 110.0
//! let resolution = resolver.resolve(Currency::GBP, Currency::JPY).unwrap();
//! assert!(matches!(resolution.path, ResolutionPath::Pivot { .. }));
//! ```

pub mod base;
pub mod resolver;
pub mod table;

pub use base::RateLookup;
pub use resolver::{IdentityPolicy, MissingRatePolicy, RateResolver, Resolution, ResolutionPath};
pub use table::{RateEntry, RateTable, RateTableBuilder};
