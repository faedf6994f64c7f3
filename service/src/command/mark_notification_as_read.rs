//! [`Command`] for marking a [`Notification`] as read.

use std::convert::Infallible;

use tracing as log;

#[cfg(doc)]
use crate::domain::Notification;
use crate::{domain::notification, Service};

use super::Command;

/// [`Command`] for marking a [`Notification`] as read.
///
/// Unknown or already read [`Notification`]s are left as is.
#[derive(Clone, Copy, Debug)]
pub struct MarkNotificationAsRead {
    /// ID of the [`Notification`] to be marked.
    pub id: notification::Id,
}

impl<St, Cl> Command<MarkNotificationAsRead> for Service<St, Cl> {
    /// Indicator whether the [`Notification`] has been changed.
    type Ok = bool;
    type Err = Infallible;

    async fn execute(
        &self,
        MarkNotificationAsRead { id }: MarkNotificationAsRead,
    ) -> Result<Self::Ok, Self::Err> {
        let mut marked = false;
        self.notifications().modify(|log| {
            marked = log.mark_as_read(id);
            marked
        });
        if marked {
            log::debug!("`Notification(id: {id})` marked as read");
        }
        Ok(marked)
    }
}
