//! [`Session`] store.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use tokio::sync::watch;

use crate::domain;

/// Sole authority for whether this client is authenticated, and as whom.
#[derive(Clone, Debug)]
pub struct Session(Arc<Inner>);

/// Shared state of a [`Session`] store.
#[derive(Debug)]
struct Inner {
    /// Current [`domain::Session`] along with its subscribers.
    state: watch::Sender<domain::Session>,

    /// Number of mutations committed so far.
    revision: AtomicU64,
}

/// Number of mutations committed to a [`Session`] store.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Revision(u64);

impl Session {
    /// Creates a new [`Session`] store seeded with the provided state.
    #[must_use]
    pub fn new(initial: domain::Session) -> Self {
        let (state, _) = watch::channel(initial);
        Self(Arc::new(Inner {
            state,
            revision: AtomicU64::new(0),
        }))
    }

    /// Returns a copy of the current [`domain::Session`].
    #[must_use]
    pub fn get(&self) -> domain::Session {
        self.0.state.borrow().clone()
    }

    /// Returns the current [`Revision`] of this store.
    #[must_use]
    pub fn revision(&self) -> Revision {
        Revision(self.0.revision.load(Ordering::Acquire))
    }

    /// Commits the provided [`domain::Session`], replacing the current one.
    ///
    /// Subscribers are notified even if the state is unchanged, so the
    /// commit is always observable.
    pub fn commit(&self, session: domain::Session) {
        _ = self.0.revision.fetch_add(1, Ordering::AcqRel);
        drop(self.0.state.send_replace(session));
    }

    /// Subscribes to the mutations committed to this store.
    ///
    /// The returned receiver considers the current state as already seen.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<domain::Session> {
        self.0.state.subscribe()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(domain::Session::default())
    }
}
