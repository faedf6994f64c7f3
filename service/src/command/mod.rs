//! [`Command`] definition.

pub mod add_notification;
pub mod clear_notifications;
pub mod login;
pub mod logout;
pub mod mark_notification_as_read;
pub mod restore_session;
pub mod set_identity;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    add_notification::AddNotification,
    clear_notifications::ClearNotifications, login::Login, logout::Logout,
    mark_notification_as_read::MarkNotificationAsRead,
    restore_session::RestoreSession, set_identity::SetIdentity,
};
