//! Domain definitions.

pub mod notification;
pub mod session;
pub mod user;

pub use self::{
    notification::Notification,
    session::Session,
    user::Identity,
};
