//! [`Memory`] [`Storage`] implementation.

use std::{collections::HashMap, sync::Arc};

use common::operations::{By, Insert, Select};
use tokio::sync::watch;
use tracerr::Traced;

use super::{Entry, Error, Key, Storage};

/// Process-local [`Storage`], lost once the process exits.
#[derive(Clone, Debug)]
pub struct Memory(Arc<watch::Sender<HashMap<Key, String>>>);

impl Memory {
    /// Creates a new empty [`Memory`] storage.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(HashMap::new());
        Self(Arc::new(tx))
    }

    /// Creates a new [`Memory`] storage holding the provided entries.
    #[must_use]
    pub fn with(entries: impl IntoIterator<Item = Entry>) -> Self {
        let this = Self::new();
        this.0.send_modify(|map| {
            map.extend(entries.into_iter().map(|e| (e.key, e.value)));
        });
        this
    }

    /// Returns the value stored under the provided [`Key`], if any.
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<String> {
        self.0.borrow().get(key).cloned()
    }

    /// Subscribes to the writes into this [`Memory`] storage.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HashMap<Key, String>> {
        self.0.subscribe()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage<Select<By<Option<String>, Key>>> for Memory {
    type Ok = Option<String>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<String>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.get(by.inner()))
    }
}

impl Storage<Insert<Entry>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(entry): Insert<Entry>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0.send_modify(|map| {
            drop(map.insert(entry.key, entry.value));
        });
        Ok(())
    }
}
