//! [`Command`] for authenticating with credentials.

use common::operations::Perform;
use derive_more::{Display, Error, From};
use secrecy::SecretBox;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::{session::Token, Identity};
use crate::{
    domain::{self, user},
    infra::{api, Api},
    Service,
};

use super::Command;

/// [`Command`] for authenticating with credentials.
///
/// On success, the [`Identity`] and its [`Token`] replace the current
/// [`domain::Session`] at once. On failure, the [`domain::Session`] is left
/// untouched. Never retried automatically.
#[derive(Clone, Debug)]
pub struct Login {
    /// [`user::Email`] to authenticate as.
    pub email: user::Email,

    /// [`user::Password`] to authenticate with.
    pub password: SecretBox<user::Password>,
}

impl<St, Cl> Command<Login> for Service<St, Cl>
where
    Cl: Api<
        Perform<api::Credentials>,
        Ok = api::Authenticated,
        Err = Traced<api::Error>,
    >,
{
    type Ok = domain::Session;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: Login) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Login { email, password } = cmd;

        // Overlapping logins are rejected rather than raced.
        let _pending = self
            .pending_login()
            .try_lock()
            .map_err(|_| tracerr::new!(E::InProgress))?;
        let revision = self.session().revision();

        log::debug!("authenticating as `{email}`");
        let api::Authenticated { access_token, user } = self
            .api()
            .execute(Perform(api::Credentials { email, password }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if self.session().revision() != revision {
            return Err(tracerr::new!(E::Superseded));
        }

        log::info!("authenticated as `User(id: {})`", user.id);
        let session = domain::Session::authenticated(user, access_token);
        self.session().commit(session.clone());

        Ok(session)
    }
}

/// Error of [`Login`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Authentication endpoint failed or rejected the credentials.
    #[display("Authentication failed: {_0}")]
    Authentication(api::Error),

    /// Another [`Login`] is still pending.
    #[display("Another `Login` is in progress")]
    #[from(ignore)]
    InProgress,

    /// [`domain::Session`] has been changed while the [`Login`] was pending,
    /// so its result is discarded.
    #[display("`Session` has changed while logging in")]
    #[from(ignore)]
    Superseded,
}
