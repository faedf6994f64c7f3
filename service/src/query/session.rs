//! [`Query`] collection related to the current [`domain::Session`].

use std::convert::Infallible;

use crate::{domain, Service};

use super::Query;

/// Queries the current [`domain::Session`].
#[derive(Clone, Copy, Debug)]
pub struct Current;

impl<St, Cl> Query<Current> for Service<St, Cl> {
    type Ok = domain::Session;
    type Err = Infallible;

    async fn execute(&self, _: Current) -> Result<Self::Ok, Self::Err> {
        Ok(self.session().get())
    }
}
