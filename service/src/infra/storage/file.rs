//! [`File`] [`Storage`] implementation.

use std::{io, path::PathBuf};

use common::operations::{By, Insert, Select};
use tokio::fs;
use tracerr::Traced;

use super::{Entry, Error, Key, Storage};

/// [`Storage`] keeping every [`Key`] in its own file inside a directory.
///
/// Writes are atomic: a value is written to a temporary file first and then
/// renamed over the previous one.
#[derive(Clone, Debug)]
pub struct File {
    /// Directory the files are stored in.
    dir: PathBuf,
}

impl File {
    /// Creates a new [`File`] storage inside the provided directory.
    ///
    /// The directory is created lazily, on the first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the path of the file holding the provided [`Key`].
    fn path(&self, key: &Key) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage<Select<By<Option<String>, Key>>> for File {
    type Ok = Option<String>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<String>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        match fs::read_to_string(self.path(by.inner())).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(tracerr::new!(Error::Io(e))),
        }
    }
}

impl Storage<Insert<Entry>> for File {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert(entry): Insert<Entry>,
    ) -> Result<Self::Ok, Self::Err> {
        let Entry { key, value } = entry;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        let path = self.path(&key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use super::{Entry, File, Key, Storage as _};

    #[tokio::test]
    async fn reads_absent_key_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = File::new(dir.path().join("nested"));

        let value = storage
            .execute(Select(By::new(Key::default())))
            .await
            .unwrap();

        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn overwrites_value() {
        let dir = tempfile::tempdir().unwrap();
        let storage = File::new(dir.path().join("nested"));

        for value in ["first", "second"] {
            storage
                .execute(Insert(Entry {
                    key: Key::default(),
                    value: value.to_owned(),
                }))
                .await
                .unwrap();
        }

        let value = storage
            .execute(Select(By::new(Key::default())))
            .await
            .unwrap();
        assert_eq!(value.as_deref(), Some("second"));
        assert!(dir.path().join("nested/auth-storage.json").exists());
        assert!(!dir.path().join("nested/auth-storage.json.tmp").exists());
    }

    #[tokio::test]
    async fn survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        File::new(dir.path())
            .execute(Insert(Entry {
                key: Key::new("other").unwrap(),
                value: "kept".to_owned(),
            }))
            .await
            .unwrap();

        let value = File::new(dir.path())
            .execute(Select(By::new(Key::new("other").unwrap())))
            .await
            .unwrap();
        assert_eq!(value.as_deref(), Some("kept"));
    }
}
