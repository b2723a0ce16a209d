//! Persistent key-value store for user preferences
//!
//! The core only needs three operations: read a key, stage a write, and flush
//! staged writes to durable storage. [`SettingsStore`] captures exactly that so
//! handlers and actions can be exercised against [`MemoryStore`] in tests.
//!
//! [`JsonFileStore`] is the production implementation: a flat JSON object of
//! string values, written under an exclusive file lock.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use fs2::FileExt;
use tradfile_core::prelude::*;

/// Narrow persistence contract used by the settings page and the backend.
///
/// `set` only changes the working copy; nothing is durable until `save`.
#[trait_variant::make(SettingsStore: Send)]
pub trait LocalSettingsStore {
    /// Read a value. `Ok(None)` when the key has never been saved.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stage a value for the next `save`.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Drop a key from the working copy; durable after the next `save`.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Flush all staged values.
    async fn save(&self) -> Result<()>;
}

fn lock_poisoned(what: &str) -> Error {
    Error::store(format!("{} lock poisoned", what))
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory store with separate working and persisted maps.
///
/// [`MemoryStore::reopen`] simulates an application restart: only values that
/// were saved survive.
#[derive(Debug, Default)]
pub struct MemoryStore {
    working: Mutex<HashMap<String, String>>,
    persisted: Mutex<HashMap<String, String>>,
    fail_saves: AtomicBool,
    save_count: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated as if `values` had been saved earlier.
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            working: Mutex::new(map.clone()),
            persisted: Mutex::new(map),
            ..Self::default()
        }
    }

    /// A fresh store holding only what was persisted in this one.
    pub fn reopen(&self) -> Self {
        let persisted = self.persisted_values();
        Self::with_values(persisted)
    }

    /// Make subsequent `save` calls fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// Snapshot of durable values.
    pub fn persisted_values(&self) -> HashMap<String, String> {
        self.persisted
            .lock()
            .map(|map| map.clone())
            .unwrap_or_default()
    }
}

impl SettingsStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let working = self.working.lock().map_err(|_| lock_poisoned("store"))?;
        Ok(working.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut working = self.working.lock().map_err(|_| lock_poisoned("store"))?;
        working.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut working = self.working.lock().map_err(|_| lock_poisoned("store"))?;
        working.remove(key);
        Ok(())
    }

    async fn save(&self) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::store("simulated save failure"));
        }
        let snapshot = self
            .working
            .lock()
            .map_err(|_| lock_poisoned("store"))?
            .clone();
        *self.persisted.lock().map_err(|_| lock_poisoned("store"))? = snapshot;
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON file store
// ─────────────────────────────────────────────────────────────────────────────

/// File-backed store: one JSON object mapping keys to string values.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`.
    ///
    /// A missing file opens empty. An unreadable or malformed file is logged
    /// and also opens empty; the next `save` replaces it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = load_values(&path);
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn load_values(path: &Path) -> BTreeMap<String, String> {
    if !path.exists() {
        debug!("No store file at {:?}, starting empty", path);
        return BTreeMap::new();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read store {:?}: {}", path, e);
            return BTreeMap::new();
        }
    };

    match parse_values(&content) {
        Ok(values) => {
            debug!("Loaded {} store values from {:?}", values.len(), path);
            values
        }
        Err(e) => {
            warn!("Failed to parse store {:?}: {}", path, e);
            BTreeMap::new()
        }
    }
}

/// Parse the store file, keeping only string-valued keys.
fn parse_values(content: &str) -> Result<BTreeMap<String, String>> {
    let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)?;
    let mut values = BTreeMap::new();
    for (key, value) in raw {
        match value {
            serde_json::Value::String(s) => {
                values.insert(key, s);
            }
            other => warn!("Ignoring non-string store value for {}: {}", key, other),
        }
    }
    Ok(values)
}

/// Write the store file under an exclusive lock.
fn write_locked(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::store(format!("Failed to create store directory: {}", e)))?;
    }

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| Error::store(format!("Failed to open store file: {}", e)))?;

    // Truncate only after the lock is held
    file.lock_exclusive()
        .map_err(|e| Error::store(format!("Failed to lock store file: {}", e)))?;
    file.set_len(0)
        .map_err(|e| Error::store(format!("Failed to truncate store file: {}", e)))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::store(format!("Failed to write store file: {}", e)))?;
    file.flush()
        .map_err(|e| Error::store(format!("Failed to flush store file: {}", e)))?;

    Ok(())
}

impl SettingsStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().map_err(|_| lock_poisoned("store"))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut values = self.values.lock().map_err(|_| lock_poisoned("store"))?;
        values.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.lock().map_err(|_| lock_poisoned("store"))?;
        values.remove(key);
        Ok(())
    }

    async fn save(&self) -> Result<()> {
        let content = {
            let values = self.values.lock().map_err(|_| lock_poisoned("store"))?;
            serde_json::to_string_pretty(&*values)?
        };

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_locked(&path, &content))
            .await
            .map_err(|e| Error::store(format!("Store save task failed: {}", e)))??;

        info!("Saved settings store to {:?}", self.path);
        Ok(())
    }
}
