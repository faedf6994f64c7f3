//! [`Query`] definition.

pub mod notifications;
pub mod session;

/// [`Query`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Query;
