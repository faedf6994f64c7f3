//! [`Command`] for adding a new [`Notification`].

use std::convert::Infallible;

use tracing as log;

use crate::{
    domain::{notification, Notification},
    Service,
};

use super::Command;

/// [`Command`] for adding a new unread [`Notification`] in front of the log.
#[derive(Clone, Debug)]
pub struct AddNotification {
    /// [`notification::Kind`] of the new [`Notification`].
    pub kind: notification::Kind,

    /// [`notification::Title`] of the new [`Notification`].
    pub title: notification::Title,

    /// [`notification::Message`] of the new [`Notification`].
    pub message: notification::Message,
}

impl<St, Cl> Command<AddNotification> for Service<St, Cl> {
    type Ok = notification::Id;
    type Err = Infallible;

    async fn execute(
        &self,
        cmd: AddNotification,
    ) -> Result<Self::Ok, Self::Err> {
        let AddNotification {
            kind,
            title,
            message,
        } = cmd;

        let notification = Notification::new(kind, title, message);
        let id = notification.id;
        log::debug!("`Notification(id: {id})` of `{kind}` kind added");

        self.notifications().modify(|log| {
            log.push(notification);
            true
        });
        Ok(id)
    }
}
