//! User-visible notification seam.
//!
//! Cache mutations emit short confirmation or failure messages ("Added to
//! cart", "Failed to fetch products"). How those are presented is not this
//! crate's concern; consumers inject a [`Notifier`] and render however they
//! like.

use std::sync::Mutex;

/// Sink for user-visible confirmations and failures.
pub trait Notifier: Send + Sync {
    /// A mutation succeeded.
    fn success(&self, message: &str);

    /// A mutation or fetch failed.
    fn error(&self, message: &str);
}

/// Notifier that forwards messages to `tracing`.
///
/// The default choice when no presentation layer is wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "tamarind::notify", message);
    }

    fn error(&self, message: &str) {
        tracing::warn!(target: "tamarind::notify", message);
    }
}

/// A recorded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

/// Notifier that records messages in memory, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications recorded so far, in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<Notification> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn push(&self, notification: Notification) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(notification);
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.push(Notification::Success(message.to_owned()));
    }

    fn error(&self, message: &str) {
        self.push(Notification::Error(message.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_emission_order() {
        let notifier = RecordingNotifier::new();
        notifier.success("added");
        notifier.error("failed");
        notifier.success("updated");
        assert_eq!(
            notifier.events(),
            vec![
                Notification::Success("added".to_owned()),
                Notification::Error("failed".to_owned()),
                Notification::Success("updated".to_owned()),
            ]
        );
    }
}
