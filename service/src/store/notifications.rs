//! [`Notifications`] store.

use std::sync::Arc;

use tokio::sync::watch;

#[cfg(doc)]
use crate::domain::Notification;
use crate::domain::notification;

/// In-memory log of user-facing [`Notification`]s with read tracking.
///
/// Not persisted: a fresh process always starts with an empty log.
#[derive(Clone, Debug)]
pub struct Notifications(Arc<watch::Sender<notification::Log>>);

impl Notifications {
    /// Returns a copy of the current [`notification::Log`].
    #[must_use]
    pub fn get(&self) -> notification::Log {
        self.0.borrow().clone()
    }

    /// Counts the unread [`Notification`]s.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.0.borrow().unread_count()
    }

    /// Applies the provided mutation to the [`notification::Log`].
    ///
    /// Subscribers are notified only if the `mutation` reports a change.
    pub fn modify(&self, mutation: impl FnOnce(&mut notification::Log) -> bool) {
        _ = self.0.send_if_modified(mutation);
    }

    /// Subscribes to the changes of the [`notification::Log`].
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<notification::Log> {
        self.0.subscribe()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        let (tx, _) = watch::channel(notification::Log::default());
        Self(Arc::new(tx))
    }
}
