//! Session token persistence
//!
//! The client never touches storage directly. It holds a [`Session`], which
//! owns the `token` key inside an injected [`TokenStore`]:
//!
//! - [`MemoryTokenStore`] keeps values for the lifetime of the process
//! - [`FileTokenStore`] persists a small JSON map on disk
//!
//! # Example
//!
//! ```rust
//! use plantsitter_api_client::session::{MemoryTokenStore, Session};
//! use std::sync::Arc;
//!
//! let session = Session::new(Arc::new(MemoryTokenStore::new()));
//! assert!(!session.is_authenticated());
//! session.store_token("abc").unwrap();
//! assert_eq!(session.token().as_deref(), Some("abc"));
//! ```

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

/// Storage key holding the bearer token
pub const TOKEN_KEY: &str = "token";

/// Token store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Stored file is not a JSON object of strings
    #[error("Corrupt session file: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// A lock was poisoned by a panicking writer
    #[error("Session store lock poisoned")]
    Poisoned,
}

/// Durable string key-value storage used for the session token
pub trait TokenStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite a value
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a value; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-process token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let guard = self.values.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut guard = self.values.write().map_err(|_| StoreError::Poisoned)?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut guard = self.values.write().map_err(|_| StoreError::Poisoned)?;
        guard.remove(key);
        Ok(())
    }
}

/// Token store backed by a JSON file
///
/// The file holds a flat object of string values. A missing file reads as
/// empty. Writes go to a uniquely named temp file in the same directory
/// which is then renamed over the original, so a crash mid-write leaves the
/// previous session intact. A corrupt file still fails reads, but the next
/// `set` or `remove` replaces it.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    /// Create a store at the given path; parent directories are created lazily
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Default location: `<data_dir>/plantsitter/session.json`
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("plantsitter")
            .join("session.json")
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(HashMap::new());
        }

        let raw: HashMap<String, Value> = serde_json::from_str(&contents)?;
        Ok(raw
            .into_iter()
            .filter_map(|(k, v)| match v {
                Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect())
    }

    /// Load for a read-modify-write cycle.
    ///
    /// A corrupt file is discarded rather than blocking the write that would
    /// replace it. The flag reports whether that happened.
    fn load_for_write(&self) -> Result<(HashMap<String, String>, bool), StoreError> {
        match self.load() {
            Ok(values) => Ok((values, false)),
            Err(StoreError::Corrupt(e)) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Corrupt session file, starting from an empty session"
                );
                Ok((HashMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn save(&self, values: &HashMap<String, String>) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // Unique temp file per write, so concurrent writers never share one
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&serde_json::to_vec_pretty(values)?)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        debug!(path = %self.path.display(), "Session file written");
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let (mut values, _) = self.load_for_write()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let (mut values, corrupt) = self.load_for_write()?;
        if values.remove(key).is_some() || corrupt {
            self.save(&values)?;
        }
        Ok(())
    }
}

/// Handle on the current login session
///
/// Clones share the same underlying store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Session {
    /// Wrap a token store
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Session held only in memory
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    /// Current bearer token.
    ///
    /// A store read failure is logged and reported as no token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }

    /// Persist a new bearer token, replacing any previous one
    pub fn store_token(&self, token: &str) -> Result<(), StoreError> {
        self.store.set(TOKEN_KEY, token)
    }

    /// Forget the bearer token
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(TOKEN_KEY)
    }

    /// Whether a token is currently stored
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}
