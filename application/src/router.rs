//! Client-side routing guarded by the authentication state.

use std::str::FromStr;

use derive_more::{Display, Error, From};
use service::{domain, store};
use tracing as log;

/// Navigation target of the application.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum Route {
    /// Login page, reachable without authentication.
    #[display("/login")]
    Login,

    /// Dashboard page.
    #[display("/")]
    Dashboard,

    /// List of the verified companies.
    #[display("/companies")]
    Companies,

    /// Single company page.
    #[display("/companies/{_0}")]
    Company(String),

    /// Any other page of the application.
    #[display("{_0}")]
    Other(String),
}

impl Route {
    /// Indicates whether this [`Route`] is reachable without authentication.
    #[must_use]
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// Parses a [`Route`] from a normalized absolute `path`.
    fn from_path(path: &str) -> Self {
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();
        match segments.as_slice() {
            [] => Self::Dashboard,
            ["login"] => Self::Login,
            ["companies"] => Self::Companies,
            ["companies", id] => Self::Company((*id).to_owned()),
            _ => Self::Other(format!("/{}", segments.join("/"))),
        }
    }
}

impl FromStr for Route {
    type Err = ParseError;

    /// Parses a [`Route`] from a navigation target, like `/companies/42?x=1`.
    ///
    /// Query and fragment are discarded, and repeated or trailing slashes
    /// are ignored.
    fn from_str(target: &str) -> Result<Self, Self::Err> {
        let target = target.split_once('#').map_or(target, |(t, _)| t);
        if target.is_empty() {
            return Ok(Self::Dashboard);
        }
        let uri = target.parse::<http::Uri>()?;
        let path = uri.path();
        if !path.starts_with('/') {
            return Err(ParseError::NotAbsolute);
        }
        Ok(Self::from_path(path))
    }
}

/// Error of parsing a [`Route`].
#[derive(Debug, Display, Error, From)]
pub enum ParseError {
    /// Navigation target is not a valid URI.
    #[display("Invalid navigation target: {_0}")]
    InvalidUri(http::uri::InvalidUri),

    /// Navigation target is not an absolute path.
    #[display("Navigation target must be an absolute path")]
    #[from(ignore)]
    NotAbsolute,
}

/// Outcome of a [`guard`]ed navigation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Navigation {
    /// Requested [`Route`] is rendered.
    Proceed(Route),

    /// Navigation is replaced with the provided [`Route`].
    Redirect(Route),
}

/// Decides whether the provided [`Route`] may be rendered for the provided
/// [`domain::Session`].
///
/// Unauthenticated access to a non-public [`Route`] is redirected to
/// [`Route::Login`], forgetting the requested [`Route`].
#[must_use]
pub fn guard(session: &domain::Session, route: Route) -> Navigation {
    if route.is_public() || session.is_authenticated() {
        Navigation::Proceed(route)
    } else {
        Navigation::Redirect(Route::Login)
    }
}

/// Router consulting the [`guard`] on every navigation.
#[derive(Clone, Debug)]
pub struct Router {
    /// [`store::Session`] the decisions are made upon.
    session: store::Session,
}

impl Router {
    /// Creates a new [`Router`] reading the provided [`store::Session`].
    #[must_use]
    pub fn new(session: store::Session) -> Self {
        Self { session }
    }

    /// Navigates to the provided [`Route`].
    ///
    /// The current [`domain::Session`] is read anew on every call.
    #[must_use]
    pub fn navigate(&self, route: Route) -> Navigation {
        let nav = guard(&self.session.get(), route);
        if let Navigation::Redirect(to) = &nav {
            log::debug!("navigation redirected to `{to}`");
        }
        nav
    }
}
