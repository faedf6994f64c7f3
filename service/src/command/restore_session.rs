//! [`Command`] for restoring a [`domain::Session`] from a known [`Token`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{self, session::Token, Identity},
    infra::{api, Api},
    Service,
};

use super::{Command, SetIdentity};

/// [`Command`] for restoring a [`domain::Session`] from a known [`Token`].
///
/// The [`Token`] is resolved into its [`Identity`] by the authentication API,
/// and then both are set via [`SetIdentity`].
#[derive(Clone, Debug)]
pub struct RestoreSession {
    /// Credential [`Token`] to restore the [`domain::Session`] with.
    pub token: Token,
}

impl<St, Cl> Command<RestoreSession> for Service<St, Cl>
where
    Cl: Api<
        Select<By<Identity, Token>>,
        Ok = Identity,
        Err = Traced<api::Error>,
    >,
{
    type Ok = domain::Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        RestoreSession { token }: RestoreSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let revision = self.session().revision();

        let identity = self
            .api()
            .execute(Select(By::new(token.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        if self.session().revision() != revision {
            return Err(tracerr::new!(E::Superseded));
        }

        log::info!("restored session of `User(id: {})`", identity.id);
        self.execute(SetIdentity { identity, token })
            .await
            .map_err(|e| match e {})
    }
}

/// Error of [`RestoreSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Authentication endpoint failed or rejected the [`Token`].
    #[display("Authentication failed: {_0}")]
    Authentication(api::Error),

    /// [`domain::Session`] has been changed while the [`Token`] was being
    /// resolved, so the result is discarded.
    #[display("`Session` has changed while restoring")]
    #[from(ignore)]
    Superseded,
}

#[cfg(test)]
mod spec {
    use crate::{
        command::Command as _,
        domain::{self, session::Token},
        infra::{api, storage::Memory},
        mock,
    };

    use super::{ExecutionError, RestoreSession};

    #[tokio::test]
    async fn restores_identity_by_token() {
        let (svc, _bg) =
            mock::service(Memory::new(), mock::Api::default()).await;

        let session = svc
            .execute(RestoreSession {
                token: Token::new("tok").unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(svc.session().get(), session);
        assert_eq!(session.identity(), Some(&mock::identity()));
        assert_eq!(session.token(), Some(&Token::new("tok").unwrap()));
    }

    #[tokio::test]
    async fn keeps_session_on_unknown_token() {
        let (svc, _bg) =
            mock::service(Memory::new(), mock::Api::default()).await;

        let err = svc
            .execute(RestoreSession {
                token: Token::new("stale").unwrap(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::Authentication(api::Error::Rejected(_)),
        ));
        assert_eq!(svc.session().get(), domain::Session::LoggedOut);
    }
}
