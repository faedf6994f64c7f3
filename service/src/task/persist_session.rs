//! [`PersistSession`] [`Task`].

use std::convert::Infallible;

use common::operations::{Insert, Perform, Start};
use tokio::sync::watch;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{self, session::Snapshot},
    infra::{storage, Storage},
    store,
};

use super::Task;

/// [`Task`] writing every committed [`domain::Session`] into a [`Storage`].
///
/// Writes are fire-and-forget: a failed write is logged and never rolls back
/// the in-memory [`domain::Session`]. Commits following each other faster
/// than they are written coalesce into a single write of the latest one.
#[derive(Clone, Debug)]
pub struct PersistSession<St> {
    /// [`Storage`] to write into.
    storage: St,

    /// [`storage::Key`] to write under.
    key: storage::Key,

    /// Subscription to the [`store::Session`] commits.
    session: watch::Receiver<domain::Session>,
}

impl<St> PersistSession<St> {
    /// Creates a new [`PersistSession`] [`Task`] observing the commits made
    /// to the provided [`store::Session`] from now on.
    #[must_use]
    pub fn new(storage: St, key: storage::Key, session: &store::Session) -> Self {
        Self {
            storage,
            key,
            session: session.subscribe(),
        }
    }
}

impl<St> Task<Start<()>> for PersistSession<St>
where
    Self: Task<Perform<Snapshot>, Ok = (), Err = Traced<storage::Error>>,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(&self, _: Start<()>) -> Result<Self::Ok, Self::Err> {
        let mut session = self.session.clone();

        // Finishes once every `store::Session` handle is dropped.
        while session.changed().await.is_ok() {
            let snapshot = Snapshot::from(&*session.borrow_and_update());
            _ = self.execute(Perform(snapshot)).await.map_err(|e| {
                log::error!("failed to persist `Session`: {e}");
            });
        }
        Ok(())
    }
}

impl<St> Task<Perform<Snapshot>> for PersistSession<St>
where
    St: Storage<
        Insert<storage::Entry>,
        Ok = (),
        Err = Traced<storage::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<storage::Error>;

    async fn execute(
        &self,
        Perform(snapshot): Perform<Snapshot>,
    ) -> Result<Self::Ok, Self::Err> {
        self.storage
            .execute(Insert(storage::Entry {
                key: self.key.clone(),
                value: snapshot.to_json(),
            }))
            .await
            .map_err(tracerr::wrap!())?;
        log::debug!("persisted `Session` under `{}` key", self.key);
        Ok(())
    }
}
