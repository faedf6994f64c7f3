//! [`Command`] for ending the current [`domain::Session`].

use std::convert::Infallible;

use tracing as log;

use crate::{domain, Service};

use super::Command;

/// [`Command`] for ending the current [`domain::Session`].
///
/// Idempotent: logging out of a [`domain::Session::LoggedOut`] still
/// persists the logged-out state.
#[derive(Clone, Copy, Debug)]
pub struct Logout;

impl<St, Cl> Command<Logout> for Service<St, Cl> {
    type Ok = ();
    type Err = Infallible;

    async fn execute(&self, _: Logout) -> Result<Self::Ok, Self::Err> {
        if let Some(identity) = self.session().get().identity() {
            log::info!("logging out `User(id: {})`", identity.id);
        }
        self.session().commit(domain::Session::LoggedOut);
        Ok(())
    }
}
