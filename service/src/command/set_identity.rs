//! [`Command`] for replacing the authenticated [`Identity`] directly.

use std::convert::Infallible;

use tracing as log;

use crate::{
    domain::{self, session::Token, Identity},
    Service,
};

use super::Command;

/// [`Command`] for replacing the authenticated [`Identity`] and its [`Token`]
/// at once, without contacting the authentication API.
#[derive(Clone, Debug)]
pub struct SetIdentity {
    /// [`Identity`] to authenticate.
    pub identity: Identity,

    /// Credential [`Token`] of the [`Identity`].
    pub token: Token,
}

impl<St, Cl> Command<SetIdentity> for Service<St, Cl> {
    type Ok = domain::Session;
    type Err = Infallible;

    async fn execute(
        &self,
        SetIdentity { identity, token }: SetIdentity,
    ) -> Result<Self::Ok, Self::Err> {
        log::debug!("setting identity `User(id: {})`", identity.id);

        let session = domain::Session::authenticated(identity, token);
        self.session().commit(session.clone());
        Ok(session)
    }
}
