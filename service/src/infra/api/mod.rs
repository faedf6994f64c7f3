//! Authentication [`Api`]-related implementations.

#[cfg(feature = "http")]
pub mod http;

use derive_more::{Display, Error as StdError, From};
use secrecy::SecretBox;
use serde::Deserialize;

#[cfg(doc)]
use common::operations::{By, Perform, Select};

use crate::domain::{session::Token, user, Identity};

#[cfg(feature = "http")]
pub use self::http::Http;

/// Remote authentication API operation.
///
/// Supported operations:
/// - [`Perform`]`<`[`Credentials`]`>` authenticates with the [`Credentials`];
/// - [`Select`]`<`[`By`]`<`[`Identity`]`, `[`Token`]`>>` looks up the
///   [`Identity`] owning the [`Token`].
pub use common::Handler as Api;

/// Credentials to authenticate with.
#[derive(Clone, Debug)]
pub struct Credentials {
    /// [`user::Email`] to authenticate as.
    pub email: user::Email,

    /// [`user::Password`] to authenticate with.
    pub password: SecretBox<user::Password>,
}

/// Response of a successful authentication.
#[derive(Clone, Debug, Deserialize)]
pub struct Authenticated {
    /// Credential [`Token`] issued for the [`Identity`].
    pub access_token: Token,

    /// Authenticated [`Identity`].
    pub user: Identity,
}

/// [`Api`] error, reported to callers as an authentication failure.
///
/// Structured error bodies returned by the endpoint are not interpreted.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "http")]
    /// [`reqwest`] transport error.
    #[display("HTTP request failed: {_0}")]
    Http(reqwest::Error),

    /// Endpoint responded with a non-success status.
    #[display("Authentication rejected with `{_0}` status")]
    #[from(ignore)]
    Rejected(#[error(not(source))] ::http::StatusCode),

    /// Endpoint responded with an unexpected body.
    #[display("Malformed authentication response: {_0}")]
    MalformedResponse(serde_json::Error),
}
