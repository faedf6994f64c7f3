//! [`Storage`]-related implementations.

pub mod file;
pub mod memory;

use std::io;

use common::operations::{By, Insert, Select};
use derive_more::{AsRef, Display, Error as StdError, From};
use tracerr::Traced;

pub use self::{file::File, memory::Memory};

/// Durable key-value storage operation.
pub use common::Handler as Storage;

/// Key addressing a value in a [`Storage`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct Key(String);

impl Key {
    /// [`Key`] the authentication session is persisted under by default.
    pub const DEFAULT: &'static str = "auth-storage";

    /// Creates a new [`Key`] if the given `key` is valid.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        Self::check(&key).then_some(Self(key))
    }

    /// Checks whether the given `key` is a valid [`Key`].
    ///
    /// [`Key`]s are used as file names, so only a conservative set of
    /// characters is allowed.
    fn check(key: impl AsRef<str>) -> bool {
        let key = key.as_ref();
        !key.is_empty()
            && key.len() <= 128
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "-_.".contains(c))
    }
}

impl Default for Key {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

/// Value to be written under a [`Key`].
#[derive(Clone, Debug)]
pub struct Entry {
    /// [`Key`] to write the value under.
    pub key: Key,

    /// Value to be written.
    pub value: String,
}

/// [`Storage`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// I/O error of a [`File`] storage.
    #[display("I/O operation failed: {_0}")]
    Io(io::Error),
}

/// [`Storage`] backend selected at runtime.
#[derive(Clone, Debug, From)]
pub enum Backend {
    /// [`File`] storage.
    File(File),

    /// [`Memory`] storage.
    Memory(Memory),
}

impl Storage<Select<By<Option<String>, Key>>> for Backend {
    type Ok = Option<String>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        op: Select<By<Option<String>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        match self {
            Self::File(s) => s.execute(op).await,
            Self::Memory(s) => s.execute(op).await,
        }
        .map_err(tracerr::wrap!())
    }
}

impl Storage<Insert<Entry>> for Backend {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(&self, op: Insert<Entry>) -> Result<Self::Ok, Self::Err> {
        match self {
            Self::File(s) => s.execute(op).await,
            Self::Memory(s) => s.execute(op).await,
        }
        .map_err(tracerr::wrap!())
    }
}
