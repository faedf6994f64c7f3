//! [`Query`] collection related to [`Notification`]s.

use std::convert::Infallible;

use crate::{domain::Notification, Service};

use super::Query;

/// Queries all the [`Notification`]s, most recent first.
#[derive(Clone, Copy, Debug)]
pub struct All;

impl<St, Cl> Query<All> for Service<St, Cl> {
    type Ok = Vec<Notification>;
    type Err = Infallible;

    async fn execute(&self, _: All) -> Result<Self::Ok, Self::Err> {
        Ok(self.notifications().get().iter().cloned().collect())
    }
}

/// Queries the number of unread [`Notification`]s.
#[derive(Clone, Copy, Debug)]
pub struct UnreadCount;

impl<St, Cl> Query<UnreadCount> for Service<St, Cl> {
    type Ok = usize;
    type Err = Infallible;

    async fn execute(&self, _: UnreadCount) -> Result<Self::Ok, Self::Err> {
        Ok(self.notifications().unread_count())
    }
}
