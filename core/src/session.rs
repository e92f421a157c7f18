//! Client-side session indicator.
//!
//! # Design
//! The signed-in user is a display flag, not a credential: one JSON blob under
//! a fixed key in a key-value store. `KeyValueStorage` is the injectable seam
//! (process memory or a JSON file on disk). `SessionStore` reads and writes
//! the blob and tells subscribers when it changes, whether the change came
//! from this store (`set`/`clear`) or from another writer of the same storage
//! (`handle_storage_event`).

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error as ThisError;

/// Key used by the current pages.
pub const SESSION_KEY: &str = "auth_user";
/// Key used by the first demo login page.
pub const LEGACY_SESSION_KEY: &str = "demo_user";

#[derive(Debug, ThisError)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("storage JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key-value storage, the shape of browser local storage.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Storage that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.items).get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.items).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.items).remove(key);
        Ok(())
    }
}

/// Storage persisted as one JSON object of string values in a file.
///
/// A missing file reads as empty. Every write rewrites the whole file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, items: &HashMap<String, String>) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = lock(&self.guard);
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = lock(&self.guard);
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        self.store(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let _guard = lock(&self.guard);
        let mut items = self.load()?;
        if items.remove(key).is_some() {
            self.store(&items)?;
        }
        Ok(())
    }
}

/// The signed-in user as the pages display it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub name: String,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl SessionUser {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile: Map::new(),
        }
    }
}

type Listener = Arc<dyn Fn(Option<&SessionUser>) + Send + Sync>;

/// Reads and writes the session blob and notifies subscribers of changes.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage + Send + Sync>,
    key: String,
    // Snapshotted before each notification; callbacks run unlocked.
    listeners: Mutex<Vec<Listener>>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage + Send + Sync>) -> Self {
        Self::with_key(storage, SESSION_KEY)
    }

    pub fn with_key(storage: Arc<dyn KeyValueStorage + Send + Sync>, key: &str) -> Self {
        Self {
            storage,
            key: key.to_string(),
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current session, or `None` when absent or unreadable.
    ///
    /// A blob that fails to parse is removed.
    pub fn get(&self) -> Option<SessionUser> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("reading session key {}: {e}", self.key);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("discarding malformed session blob under {}: {e}", self.key);
                if let Err(e) = self.storage.remove_item(&self.key) {
                    warn!("removing session key {}: {e}", self.key);
                }
                None
            }
        }
    }

    pub fn set(&self, user: &SessionUser) -> Result<(), StorageError> {
        let raw = serde_json::to_string(user)?;
        self.storage.set_item(&self.key, &raw)?;
        self.notify(Some(user));
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_item(&self.key)?;
        self.notify(None);
        Ok(())
    }

    pub fn subscribe(&self, listener: impl Fn(Option<&SessionUser>) + Send + Sync + 'static) {
        lock(&self.listeners).push(Arc::new(listener));
    }

    /// Another writer changed `key` in the shared storage. Re-read and
    /// notify when it is the session key; ignore anything else.
    pub fn handle_storage_event(&self, key: &str) {
        if key != self.key {
            return;
        }
        let current = self.get();
        self.notify(current.as_ref());
    }

    fn notify(&self, user: Option<&SessionUser>) {
        let listeners = lock(&self.listeners).clone();
        for listener in &listeners {
            listener(user);
        }
    }
}
