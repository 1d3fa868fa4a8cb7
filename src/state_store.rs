//! Saved-state collaborators: remember each wizard's current step.
//!
//! Only a single integer per wizard is stored, under
//! `stepwise_state_<uid>`.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of every saved-state key.
pub const STATE_KEY_PREFIX: &str = "stepwise_state_";

pub fn state_key(uid: &str) -> String {
    format!("{STATE_KEY_PREFIX}{uid}")
}

/// Long-lived key/value store for step positions.
pub trait StateStore {
    fn load(&self, key: &str) -> Option<usize>;
    fn save(&mut self, key: &str, index: usize) -> Result<()>;
}

/// In-process store, mostly useful for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    entries: HashMap<String, usize>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: impl Into<String>, index: usize) -> Self {
        self.entries.insert(key.into(), index);
        self
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.entries.get(key).copied()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self, key: &str) -> Option<usize> {
        self.get(key)
    }

    fn save(&mut self, key: &str, index: usize) -> Result<()> {
        self.entries.insert(key.to_string(), index);
        Ok(())
    }
}

/// JSON file holding every saved position, rewritten on each save.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
    entries: HashMap<String, usize>,
}

impl FileStateStore {
    pub const FILE_NAME: &'static str = "wizard-state.json";

    /// Open (or start) the store in `state_dir`.
    pub fn open(state_dir: &Path) -> Result<Self> {
        fs::create_dir_all(state_dir).context("Failed to create state directory")?;
        let path = state_dir.join(Self::FILE_NAME);

        let entries = if path.exists() {
            let contents = fs::read_to_string(&path).context("Failed to read state file")?;
            serde_json::from_str(&contents).context("Failed to parse state file")?
        } else {
            HashMap::new()
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStateStore {
    fn load(&self, key: &str) -> Option<usize> {
        self.entries.get(key).copied()
    }

    fn save(&mut self, key: &str, index: usize) -> Result<()> {
        self.entries.insert(key.to_string(), index);
        let contents = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, contents).context("Failed to write state file")?;
        Ok(())
    }
}
