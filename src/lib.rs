//! # currency_converter
//!
//! Core of a currency-conversion widget: a sparse table of exchange rates, a
//! resolver that falls back to inverse and pivot rates, and a conversion
//! session that runs each request after a simulated delay.
//!
//! The presentation layer stays outside this crate. It feeds input events to
//! a [`session::ConversionSession`] (or drives [`state::reduce`] itself) and
//! renders the resulting [`state::ConversionState`].
//!
//! ## Example
//!
//! ```rust
//! use currency_converter::prelude::*;
//!
//! let resolver = RateResolver::new(RateTable::reference());
//! let request = ConversionRequest::parse("10", Currency::GBP, Currency::JPY).unwrap();
//! let result = convert(&resolver, &request).unwrap();
//!
//! assert_eq!(result.converted_display(), "1507.00");
//! assert_eq!(result.rate_summary(), "1 GBP = 150.7000 JPY");
//! ```

pub mod conversion;
pub mod currency;
pub mod error;
pub mod fx;
pub mod notify;
pub mod state;

#[cfg(feature = "async")]
pub mod session;

#[cfg(feature = "cli")]
pub mod config;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::conversion::{convert, ConversionRequest, ConversionResult};
    pub use crate::currency::{Currency, CurrencyPair};
    pub use crate::error::{ConverterError, Result};
    pub use crate::fx::{
        IdentityPolicy, MissingRatePolicy, RateLookup, RateResolver, RateTable, ResolutionPath,
    };
    pub use crate::notify::{Notification, Notifier};
    pub use crate::state::{reduce, ConversionEvent, ConversionState, RacePolicy};

    #[cfg(feature = "async")]
    pub use crate::session::{ConversionSession, SessionConfig};
}
