//! Key-value storage interface for CyberForge
//!
//! Stores hold small JSON documents under string keys. The cart store talks
//! only to this trait, so the same state logic runs against a directory on
//! disk or an in-memory map.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use crate::core::errors::{StoreError, StoreResult};

/// Trait for providing string storage to the cart store
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// # Returns
    /// * `Ok(Some(value))` - If the key exists
    /// * `Ok(None)` - If nothing has been stored under the key
    /// * `Err(StoreError)` - If the backing storage cannot be read
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Store backed by one `<key>.json` file per key in a directory
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at `root`; the directory is created on first write
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keep keys from escaping the store directory
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{file_name}.json"))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => {
                debug!("Read {} bytes for key '{}'", value.len(), key);
                Ok(Some(value))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                Err(StoreError::PermissionDenied {
                    path: path.display().to_string(),
                })
            }
            Err(e) => Err(StoreError::Io {
                message: format!("Failed to read '{}': {}", path.display(), e),
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| StoreError::Io {
            message: format!(
                "Failed to create store directory '{}': {}",
                self.root.display(),
                e
            ),
        })?;

        let path = self.path_for(key);
        std::fs::write(&path, value).map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => StoreError::PermissionDenied {
                path: path.display().to_string(),
            },
            _ => StoreError::Io {
                message: format!("Failed to write '{}': {}", path.display(), e),
            },
        })?;

        debug!("Wrote {} bytes for key '{}'", value.len(), key);
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
    /// Whether operations should fail
    pub should_fail: bool,
    /// Writes to this key fail while everything else succeeds
    pub failing_key: Option<String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose every operation fails
    pub fn with_failure() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            should_fail: true,
            failing_key: None,
        }
    }

    /// Create a store where only writes to `key` fail
    pub fn failing_writes_to<K: Into<String>>(key: K) -> Self {
        Self {
            failing_key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Seed a raw value, bypassing any schema
    pub fn insert_raw<K: Into<String>, V: Into<String>>(&self, key: K, value: V) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.into(), value.into());
        }
    }

    fn check(&self) -> StoreResult<()> {
        if self.should_fail {
            return Err(StoreError::Io {
                message: "Mock failure".to_string(),
            });
        }
        Ok(())
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values.lock().map_err(|_| StoreError::Io {
            message: "Store lock poisoned".to_string(),
        })
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.check()?;
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check()?;
        if self.failing_key.as_deref() == Some(key) {
            return Err(StoreError::Io {
                message: format!("Mock failure writing '{key}'"),
            });
        }
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.check()?;
        self.lock()?.remove(key);
        Ok(())
    }
}
