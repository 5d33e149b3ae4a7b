//! Rate lookup trait

use crate::currency::Currency;

/// Source of tabulated (direct) exchange rates
///
/// Implementors only answer for pairs they actually hold; deriving inverse
/// and pivot rates is the resolver's job.
pub trait RateLookup: Send + Sync {
    /// Tabulated rate such that `to_amount = from_amount * rate`
    fn direct_rate(&self, from: Currency, to: Currency) -> Option<f64>;

    /// Check if a direct entry exists
    fn has_rate(&self, from: Currency, to: Currency) -> bool {
        self.direct_rate(from, to).is_some()
    }
}

impl<T: RateLookup + ?Sized> RateLookup for &T {
    fn direct_rate(&self, from: Currency, to: Currency) -> Option<f64> {
        (**self).direct_rate(from, to)
    }
}

impl<T: RateLookup + ?Sized> RateLookup for std::sync::Arc<T> {
    fn direct_rate(&self, from: Currency, to: Currency) -> Option<f64> {
        (**self).direct_rate(from, to)
    }
}
