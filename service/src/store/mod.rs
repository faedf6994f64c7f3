//! Injectable state containers.
//!
//! Each container is a cheaply cloneable handle: every clone observes and
//! mutates the same state. Mutations are applied one at a time and every
//! committed mutation is broadcast to the subscribers.

mod notifications;
mod session;

pub use self::{notifications::Notifications, session::Session};
