//! User-facing notifications as an injected capability

use crate::conversion::{ConversionRequest, ConversionResult};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A toast-style message for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    /// `Conversion Complete!` with `100 EUR = 118.00 USD`
    pub fn completed(result: &ConversionResult) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Conversion Complete!".to_string(),
            description: result.summary(),
        }
    }

    pub fn failed(request: &ConversionRequest, reason: &str) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Conversion Failed".to_string(),
            description: format!(
                "{} {} to {}: {}",
                request.amount_text, request.from, request.to, reason
            ),
        }
    }
}

/// Receives notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

impl<F> Notifier for F
where
    F: Fn(&Notification) + Send + Sync,
{
    fn notify(&self, notification: &Notification) {
        self(notification)
    }
}

/// Discards every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notification: &Notification) {}
}

/// Forwards notifications to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.kind {
            NotificationKind::Success => {
                log::info!("{} {}", notification.title, notification.description)
            }
            NotificationKind::Error => {
                log::warn!("{} {}", notification.title, notification.description)
            }
        }
    }
}

/// Buffers notifications until the presentation layer drains them
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Mutex<Vec<Notification>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all buffered notifications, oldest first
    pub fn drain(&self) -> Vec<Notification> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *pending)
    }

    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: &Notification) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::convert;
    use crate::currency::Currency;
    use crate::fx::{RateResolver, RateTable};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn result() -> ConversionResult {
        let resolver = RateResolver::new(RateTable::reference());
        let request = ConversionRequest::parse("100", Currency::EUR, Currency::USD).unwrap();
        convert(&resolver, &request).unwrap()
    }

    #[test]
    fn test_completed_message() {
        let notification = Notification::completed(&result());
        assert_eq!(notification.kind, NotificationKind::Success);
        assert_eq!(notification.title, "Conversion Complete!");
        assert_eq!(notification.description, "100 EUR = 118.00 USD");
    }

    #[test]
    fn test_failed_message() {
        let request = ConversionRequest::parse("5", Currency::CHF, Currency::GBP).unwrap();
        let notification = Notification::failed(&request, "No rate available for USD-GBP");
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(
            notification.description,
            "5 CHF to GBP: No rate available for USD-GBP"
        );
    }

    #[test]
    fn test_queue_drain() {
        let queue = NotificationQueue::new();
        queue.notify(&Notification::completed(&result()));
        queue.notify(&Notification::completed(&result()));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain().len(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_closure_notifier() {
        let count = AtomicUsize::new(0);
        let notifier = |_: &Notification| {
            count.fetch_add(1, Ordering::SeqCst);
        };
        notifier.notify(&Notification::completed(&result()));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
