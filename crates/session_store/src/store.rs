use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SessionStoreError;
use crate::paths::{key_file_name, validate_key};

/// Durable string-keyed storage.
///
/// Values are opaque strings; typed access goes through [`load_json`] and [`persist_json`].
pub trait KeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>, SessionStoreError>;
    fn persist(&mut self, key: &str, value: &str) -> Result<(), SessionStoreError>;
}

/// One file per key under a root directory.
///
/// Writes go to a sibling temp file first and are renamed into place, so a crash mid-write
/// leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SessionStoreError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|source| SessionStoreError::io("creating store directory", &root, source))?;
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, SessionStoreError> {
        validate_key(key)?;
        Ok(self.root.join(key_file_name(key)))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SessionStoreError::io("reading stored value", &path, source)),
        }
    }

    fn persist(&mut self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("json.tmp");

        let mut file = fs::File::create(&tmp_path)
            .map_err(|source| SessionStoreError::io("creating temp file", &tmp_path, source))?;
        file.write_all(value.as_bytes())
            .map_err(|source| SessionStoreError::io("writing temp file", &tmp_path, source))?;
        file.sync_all()
            .map_err(|source| SessionStoreError::io("syncing temp file", &tmp_path, source))?;
        drop(file);

        fs::rename(&tmp_path, &path)
            .map_err(|source| SessionStoreError::io("replacing stored value", &path, source))?;
        tracing::trace!(key, bytes = value.len(), "persisted value");
        Ok(())
    }
}

/// Process-local store, used by tests and by hosts without a writable state directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        validate_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn persist(&mut self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        validate_key(key)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn load(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        (**self).load(key)
    }

    fn persist(&mut self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        (**self).persist(key, value)
    }
}

/// Loads and decodes a JSON value. `Ok(None)` means the key was never written.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>, SessionStoreError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.load(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| SessionStoreError::json_parse(key, source))
}

pub fn persist_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), SessionStoreError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw =
        serde_json::to_string(value).map_err(|source| SessionStoreError::json_serialize(key, source))?;
    store.persist(key, &raw)
}
