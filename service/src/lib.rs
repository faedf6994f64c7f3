//! Service contains the client session and notification state of the
//! application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
#[cfg(test)]
mod mock;
pub mod query;
pub mod store;
pub mod task;

use std::{error::Error, sync::Arc};

use common::operations::{By, Select, Start};
use tokio::sync::Mutex;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::session::Snapshot,
    infra::{storage, Storage},
};

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// [`storage::Key`] the [`domain::Session`] is persisted under.
    pub storage_key: storage::Key,
}

/// Client session and notification service.
///
/// Owns the [`store::Session`] and [`store::Notifications`] containers, and
/// the infrastructure they are backed by. Clones share the same state.
#[derive(Clone, Debug)]
pub struct Service<St, Cl> {
    /// Configuration of this [`Service`].
    config: Config,

    /// Durable [`Storage`] of this [`Service`].
    storage: St,

    /// Authentication [`Api`] client of this [`Service`].
    ///
    /// [`Api`]: infra::Api
    api: Cl,

    /// [`store::Session`] of this [`Service`].
    session: store::Session,

    /// [`store::Notifications`] of this [`Service`].
    notifications: store::Notifications,

    /// Lock held while a [`command::Login`] is pending.
    pending_login: Arc<Mutex<()>>,
}

impl<St, Cl> Service<St, Cl> {
    /// Creates a new [`Service`] with the provided parameters.
    ///
    /// The [`domain::Session`] is rehydrated from the provided [`Storage`]
    /// before the [`Service`] is returned, and every further mutation of it
    /// is persisted by the returned [`task::Background`].
    pub async fn new(
        config: Config,
        storage: St,
        api: Cl,
    ) -> (Self, task::Background)
    where
        St: Storage<
                Select<By<Option<String>, storage::Key>>,
                Ok = Option<String>,
                Err = Traced<storage::Error>,
            > + Clone
            + 'static,
        task::PersistSession<St>:
            Task<Start<()>, Ok = (), Err: Error + 'static> + 'static,
    {
        let session = store::Session::new(
            Self::rehydrate(&storage, config.storage_key.clone()).await,
        );

        let mut bg = task::Background::default();
        let persist = task::PersistSession::new(
            storage.clone(),
            config.storage_key.clone(),
            &session,
        );
        bg.spawn("PersistSession", async move {
            persist.execute(Start(())).await
        });

        let this = Self {
            config,
            storage,
            api,
            session,
            notifications: store::Notifications::default(),
            pending_login: Arc::new(Mutex::new(())),
        };
        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Storage`] of this [`Service`].
    #[must_use]
    pub fn storage(&self) -> &St {
        &self.storage
    }

    /// Returns authentication [`Api`] client of this [`Service`].
    ///
    /// [`Api`]: infra::Api
    #[must_use]
    pub fn api(&self) -> &Cl {
        &self.api
    }

    /// Returns [`store::Session`] of this [`Service`].
    #[must_use]
    pub fn session(&self) -> &store::Session {
        &self.session
    }

    /// Returns [`store::Notifications`] of this [`Service`].
    #[must_use]
    pub fn notifications(&self) -> &store::Notifications {
        &self.notifications
    }

    /// Returns the lock held while a [`command::Login`] is pending.
    pub(crate) fn pending_login(&self) -> &Mutex<()> {
        &self.pending_login
    }

    /// Reads the persisted [`domain::Session`] from the provided [`Storage`].
    ///
    /// Absent, unreadable or malformed [`Snapshot`]s are treated as no
    /// [`domain::Session`] at all.
    async fn rehydrate(storage: &St, key: storage::Key) -> domain::Session
    where
        St: Storage<
            Select<By<Option<String>, storage::Key>>,
            Ok = Option<String>,
            Err = Traced<storage::Error>,
        >,
    {
        match storage.execute(Select(By::new(key))).await {
            Ok(None) => {
                log::debug!("no persisted `Session` found");
                domain::Session::LoggedOut
            }
            Ok(Some(raw)) => match Snapshot::from_json(&raw) {
                Ok(snapshot) => domain::Session::from(snapshot),
                Err(e) => {
                    log::warn!("discarding persisted `Session`: {e}");
                    domain::Session::LoggedOut
                }
            },
            Err(e) => {
                log::warn!("failed to read persisted `Session`: {e}");
                domain::Session::LoggedOut
            }
        }
    }
}
