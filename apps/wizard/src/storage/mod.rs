//! Durable state persistence.
//!
//! Four independently keyed entries: view, step, template id, and the
//! serialized document. Saves are best-effort — a failed write is logged
//! and swallowed, never surfaced to the user flow. Loads always succeed:
//! a missing key, malformed JSON, or a value outside its domain yields
//! the documented default for that key.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Resume;
use crate::session::View;
use crate::steps::Step;
use crate::templates::{TemplateRegistry, DEFAULT_TEMPLATE};

pub const KEY_VIEW: &str = "builder.view";
pub const KEY_STEP: &str = "builder.step";
pub const KEY_TEMPLATE: &str = "builder.template";
pub const KEY_DOCUMENT: &str = "builder.document";

const ALL_KEYS: [&str; 4] = [KEY_VIEW, KEY_STEP, KEY_TEMPLATE, KEY_DOCUMENT];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Minimal key-value store seam. Implementations must tolerate concurrent
/// readers; writes may fail and callers treat failure as non-fatal.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str);
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store
// ────────────────────────────────────────────────────────────────────────────

/// Process-local store. The default when no storage path is configured.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// File-backed store
// ────────────────────────────────────────────────────────────────────────────

/// Single-file JSON store. The whole map is rewritten on every put; state
/// is small (one document plus three short strings), so this stays cheap.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`. A missing or unreadable file starts
    /// empty — corruption degrades to defaults, it never fails the open.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("State file {} is corrupt, starting empty: {e}", path.display());
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        let raw = serde_json::to_string(entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
            if let Err(e) = self.flush(&entries) {
                warn!("Dropped state removal for '{key}': {e}");
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Typed gateway
// ────────────────────────────────────────────────────────────────────────────

/// Typed accessors over the four persisted entries.
#[derive(Clone)]
pub struct StateGateway {
    store: Arc<dyn KvStore>,
}

impl StateGateway {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    // Saves: best-effort by contract. Failure is observable in the log
    // but must never interrupt the user flow.
    fn save<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Dropped state write for '{key}' (serialize): {e}");
                return;
            }
        };
        if let Err(e) = self.store.put(key, &raw) {
            warn!("Dropped state write for '{key}': {e}");
        }
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Invalid persisted value for '{key}', using default: {e}");
                None
            }
        }
    }

    pub fn save_view(&self, view: View) {
        self.save(KEY_VIEW, &view);
    }

    pub fn load_view(&self) -> View {
        self.load(KEY_VIEW).unwrap_or_default()
    }

    pub fn save_step(&self, step: Step) {
        self.save(KEY_STEP, &step);
    }

    pub fn load_step(&self) -> Step {
        self.load(KEY_STEP).unwrap_or_else(Step::first)
    }

    pub fn save_template(&self, id: &str) {
        self.save(KEY_TEMPLATE, &id);
    }

    /// Loads the selected template id. Ids not present in the registry
    /// (renamed or retired templates) fall back to the baseline.
    pub fn load_template(&self, registry: &TemplateRegistry) -> String {
        match self.load::<String>(KEY_TEMPLATE) {
            Some(id) if registry.is_known(&id) => id,
            Some(id) => {
                debug!("Persisted template '{id}' is unknown, using default");
                DEFAULT_TEMPLATE.to_string()
            }
            None => DEFAULT_TEMPLATE.to_string(),
        }
    }

    pub fn save_document(&self, doc: &Resume) {
        self.save(KEY_DOCUMENT, doc);
    }

    pub fn load_document(&self) -> Resume {
        self.load(KEY_DOCUMENT).unwrap_or_else(Resume::sample)
    }

    /// Removes all four entries. Used by the explicit reset action.
    pub fn clear(&self) {
        for key in ALL_KEYS {
            self.store.remove(key);
        }
    }
}
