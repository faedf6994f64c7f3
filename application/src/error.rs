//! [`Error`]-related definitions.

use std::fmt;

use derive_more::Error as StdError;
use itertools::Itertools as _;
use service::{
    command,
    infra::{api, storage},
};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// User-facing [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Create a new [`Error`] representing an unexpected failure.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_ERROR",
            message: msg.to_string(),
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("\n{trace}"))),
        )
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for api::Error {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Rejected(status) if status.is_client_error() => {
                Some(AuthError::WrongCredentials.into())
            }
            Self::Rejected(_) | Self::MalformedResponse(_) => {
                Some(AuthError::Unavailable.into())
            }
            Self::Http(_) => Some(AuthError::Unavailable.into()),
        }
    }
}

impl AsError for storage::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for command::login::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Authentication(e) => e.try_as_error(),
            Self::InProgress => Some(AuthError::InProgress.into()),
            Self::Superseded => Some(AuthError::Superseded.into()),
        }
    }
}

impl AsError for command::restore_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Authentication(api::Error::Rejected(status))
                if status.is_client_error() =>
            {
                Some(AuthError::InvalidToken.into())
            }
            Self::Authentication(e) => e.try_as_error(),
            Self::Superseded => Some(AuthError::Superseded.into()),
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "WRONG_CREDENTIALS"]
        #[message = "Wrong email or password"]
        WrongCredentials,

        #[code = "INVALID_TOKEN"]
        #[message = "Token is invalid or expired"]
        InvalidToken,

        #[code = "AUTHENTICATION_UNAVAILABLE"]
        #[message = "Authentication service is unavailable"]
        Unavailable,

        #[code = "LOGIN_IN_PROGRESS"]
        #[message = "Another login is in progress"]
        InProgress,

        #[code = "SESSION_SUPERSEDED"]
        #[message = "Session has changed while authenticating"]
        Superseded,
    }
}
