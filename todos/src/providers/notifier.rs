//! Notification delivery.

use crate::notification::{Notification, NotificationKind};
use tokio::sync::mpsc;

/// Delivers transient notifications to the user.
///
/// Delivery is fire-and-forget: nothing in the todo list depends on it.
pub trait Notifier: Send + Sync {
    /// Show `notification`.
    fn notify(&self, notification: Notification);
}

/// Forwards notifications to a channel drained by the shell.
#[derive(Clone, Debug)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end of its channel
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            tracing::debug!("Notification dropped: receiver closed");
        }
    }
}

/// Writes notifications to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Info => tracing::info!(
                title = %notification.title,
                description = %notification.description,
                "Notification"
            ),
            NotificationKind::Error => tracing::warn!(
                title = %notification.title,
                description = %notification.description,
                "Error notification"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_notifier_forwards_in_order() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.notify(Notification::todo_added());
        notifier.notify(Notification::error("boom"));

        assert_eq!(rx.try_recv().ok(), Some(Notification::todo_added()));
        assert_eq!(rx.try_recv().ok(), Some(Notification::error("boom")));
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.notify(Notification::todo_deleted());
        TracingNotifier.notify(Notification::todo_deleted());
    }
}
