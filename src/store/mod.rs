//! Durable preference storage.
//!
//! [`PersistentValueStore`] wraps an injected [`KeyValueBackend`] with typed
//! load/write semantics and a per-key first-observation flag: the very first
//! write after a load is suppressed so the just-loaded value is not
//! immediately rewritten. Each key is owned by exactly one logical field in
//! the core, so no read-modify-write atomicity is needed.
//!
//! Two backends ship with the crate:
//! - [`YamlFileBackend`]: one YAML mapping on disk, insertion order preserved
//! - [`MemoryBackend`]: ephemeral map with a write counter, for tests

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fs;

/// Durable key-value capability the core requires from its environment.
///
/// `get` and `set` are synchronous; the store treats the capability as
/// reliable and only propagates I/O errors for the caller to log.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueBackend: Send {
    /// The stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Durably write `value` under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Typed get/set over a durable backend with first-observation suppression.
pub struct PersistentValueStore {
    backend: Box<dyn KeyValueBackend>,
    /// Keys that have completed their first observation since construction.
    observed: HashSet<String>,
}

impl PersistentValueStore {
    pub fn new(backend: Box<dyn KeyValueBackend>) -> Self {
        Self {
            backend,
            observed: HashSet::new(),
        }
    }

    /// Synchronous read: the stored value if present, else `default`.
    ///
    /// Called once per key at core construction. Loading does not mark the
    /// key observed; the first subsequent [`write`](Self::write) does.
    pub fn load(&self, key: &str, default: &str) -> String {
        match self.backend.get(key) {
            Some(value) => value,
            None => {
                tracing::debug!("No stored value for {:?}, using default", key);
                default.to_string()
            }
        }
    }

    /// Write-through to the backend.
    ///
    /// The very first write after `load` for a given key is suppressed, so
    /// the just-loaded value is not rewritten; the key's observation flag is
    /// set and stays set for the life of the instance. Returns whether the
    /// value actually reached the backend.
    pub fn write(&mut self, key: &str, value: &str) -> Result<bool> {
        if self.observed.insert(key.to_string()) {
            tracing::debug!("First observation of {:?}, write suppressed", key);
            return Ok(false);
        }

        self.backend
            .set(key, value)
            .with_context(|| format!("Failed to persist {:?}", key))?;
        Ok(true)
    }

    /// Whether `key` has completed its first observation.
    pub fn is_observed(&self, key: &str) -> bool {
        self.observed.contains(key)
    }
}

/// File-backed key-value store: a single flat YAML mapping.
///
/// The whole mapping is loaded at open and rewritten on every set, which is
/// fine at preference scale. Insertion order is preserved in the file.
#[derive(Debug)]
pub struct YamlFileBackend {
    path: Utf8PathBuf,
    entries: IndexMap<String, String>,
}

impl YamlFileBackend {
    /// Open the prefs file at `path`, creating its parent directory if
    /// needed. A missing file starts the store empty.
    pub fn open<P: AsRef<Utf8Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create data directory: {}", parent))?;
            }
        }

        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read prefs file: {}", path))?;
            serde_yaml_ng::from_str(&contents)
                .with_context(|| format!("Failed to parse prefs file: {}", path))?
        } else {
            tracing::debug!("Prefs file not found at {}, starting empty", path);
            IndexMap::new()
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl KeyValueBackend for YamlFileBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());

        let yaml = serde_yaml_ng::to_string(&self.entries)
            .context("Failed to serialize prefs to YAML")?;
        fs::write(&self.path, yaml)
            .with_context(|| format!("Failed to write prefs file: {}", self.path))?;

        tracing::debug!("Saved {:?} to {}", key, self.path);
        Ok(())
    }
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: IndexMap<String, String>,
    writes: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, as if it survived a previous session.
    pub fn seeded(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    /// Number of sets that reached this backend.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
