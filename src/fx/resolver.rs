//! Rate resolution with inverse and pivot fallbacks
//!
//! Resolution order for `from -> to`:
//!
//! 1. direct entry `from-to`
//! 2. reciprocal of the reverse entry `to-from`
//! 3. pivot product `table[from-PIVOT] * table[PIVOT-to]`, where a missing leg
//!    is either replaced by `1` or rejected depending on [`MissingRatePolicy`]
//!
//! Identical currencies are only short-circuited under [`IdentityPolicy::Exact`].

use super::base::RateLookup;
use crate::currency::Currency;
use crate::error::{ConverterError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How `from == to` is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityPolicy {
    /// Always exactly 1
    #[default]
    Exact,
    /// No special case: falls through to the pivot product, which is only
    /// 1 when the table happens to be symmetric around the pivot
    Legacy,
}

/// How a missing pivot leg is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRatePolicy {
    /// Substitute 1 for the missing leg
    #[default]
    Substitute,
    /// Fail with [`ConverterError::MissingRate`]
    Reject,
}

/// How an effective rate was derived
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionPath {
    Identity,
    Direct,
    Inverse,
    /// Pivot legs as found in the table; `None` marks a substituted leg
    Pivot {
        pivot: Currency,
        to_pivot: Option<f64>,
        from_pivot: Option<f64>,
    },
}

impl fmt::Display for ResolutionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let leg = |rate: Option<f64>| match rate {
            Some(rate) => rate.to_string(),
            None => "1 (missing)".to_string(),
        };
        match self {
            ResolutionPath::Identity => write!(f, "identity"),
            ResolutionPath::Direct => write!(f, "direct"),
            ResolutionPath::Inverse => write!(f, "inverse"),
            ResolutionPath::Pivot {
                pivot,
                to_pivot,
                from_pivot,
            } => write!(
                f,
                "via {}: {} x {}",
                pivot,
                leg(*to_pivot),
                leg(*from_pivot)
            ),
        }
    }
}

/// An effective rate and its derivation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub rate: f64,
    pub path: ResolutionPath,
}

/// Resolves effective rates over a [`RateLookup`]
///
/// # Example
/// ```
/// use currency_converter::currency::Currency;
/// use currency_converter::fx::{RateResolver, RateTable};
///
/// let resolver = RateResolver::new(RateTable::reference());
/// let rate = resolver.rate(Currency::GBP, Currency::JPY).unwrap();
/// assert!((rate - 150.7).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct RateResolver<L: RateLookup> {
    table: L,
    pivot: Currency,
    identity: IdentityPolicy,
    missing: MissingRatePolicy,
}

impl<L: RateLookup> RateResolver<L> {
    /// Resolver with USD pivot, exact identity and substituted pivot legs
    pub fn new(table: L) -> Self {
        Self {
            table,
            pivot: Currency::USD,
            identity: IdentityPolicy::default(),
            missing: MissingRatePolicy::default(),
        }
    }

    /// Create with configuration
    pub fn with_config(
        table: L,
        pivot: Currency,
        identity: IdentityPolicy,
        missing: MissingRatePolicy,
    ) -> Self {
        Self {
            table,
            pivot,
            identity,
            missing,
        }
    }

    /// Resolver reproducing the reference behaviour exactly
    pub fn legacy(table: L) -> Self {
        Self::with_config(
            table,
            Currency::USD,
            IdentityPolicy::Legacy,
            MissingRatePolicy::Substitute,
        )
    }

    pub fn table(&self) -> &L {
        &self.table
    }

    pub fn pivot(&self) -> Currency {
        self.pivot
    }

    pub fn identity_policy(&self) -> IdentityPolicy {
        self.identity
    }

    pub fn missing_rate_policy(&self) -> MissingRatePolicy {
        self.missing
    }

    /// Effective rate such that `1 from == rate to`
    pub fn rate(&self, from: Currency, to: Currency) -> Result<f64> {
        self.resolve(from, to).map(|r| r.rate)
    }

    /// Effective rate together with how it was derived
    pub fn resolve(&self, from: Currency, to: Currency) -> Result<Resolution> {
        if from == to && self.identity == IdentityPolicy::Exact {
            return Ok(Resolution {
                rate: 1.0,
                path: ResolutionPath::Identity,
            });
        }

        if let Some(rate) = self.table.direct_rate(from, to) {
            log::trace!("{}-{}: direct rate {}", from, to, rate);
            return Ok(Resolution {
                rate,
                path: ResolutionPath::Direct,
            });
        }

        if let Some(reverse) = self.table.direct_rate(to, from) {
            log::trace!("{}-{}: inverse of {}", from, to, reverse);
            return Ok(Resolution {
                rate: 1.0 / reverse,
                path: ResolutionPath::Inverse,
            });
        }

        let to_pivot = self.pivot_leg(from, self.pivot)?;
        let from_pivot = self.pivot_leg(self.pivot, to)?;
        let rate = to_pivot.unwrap_or(1.0) * from_pivot.unwrap_or(1.0);
        log::debug!(
            "{}-{}: resolved via {} as {:?} x {:?} = {}",
            from,
            to,
            self.pivot,
            to_pivot,
            from_pivot,
            rate
        );

        Ok(Resolution {
            rate,
            path: ResolutionPath::Pivot {
                pivot: self.pivot,
                to_pivot,
                from_pivot,
            },
        })
    }

    /// One pivot leg; `None` means the leg was substituted by 1
    fn pivot_leg(&self, from: Currency, to: Currency) -> Result<Option<f64>> {
        match self.table.direct_rate(from, to) {
            Some(rate) => Ok(Some(rate)),
            None if from == to => Ok(None),
            None => match self.missing {
                MissingRatePolicy::Substitute => Ok(None),
                MissingRatePolicy::Reject => Err(ConverterError::MissingRate { from, to }),
            },
        }
    }
}
