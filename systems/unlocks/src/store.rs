//! Persistence backends for the unlocked collection.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use gene_link_core::Diagnosis;

/// Default key, used as the file name of the JSON store.
pub const DEFAULT_STORE_KEY: &str = "genelink_unlocked_full.json";

/// Errors raised by unlock stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("unlock store I/O failed: {0}")]
    Io(#[from] io::Error),
    /// The stored collection could not be encoded or decoded.
    #[error("unlock store contents are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Single-slot key-value store holding the unlocked collection.
pub trait UnlockStore {
    /// Reads the stored collection. An absent slot yields an empty collection.
    fn load(&self) -> Result<Vec<Diagnosis>, StoreError>;

    /// Replaces the stored collection with the provided entries.
    fn save(&mut self, entries: &[Diagnosis]) -> Result<(), StoreError>;
}

/// Store backed by a JSON file that is rewritten in full on every save.
///
/// Saves go to a sibling temporary file that is then renamed over the target,
/// so readers only ever observe a complete collection.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store reading and writing the provided path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| DEFAULT_STORE_KEY.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl UnlockStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Diagnosis>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&mut self, entries: &[Diagnosis]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        let staging = self.staging_path();
        fs::write(&staging, json)?;
        if let Err(error) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(error.into());
        }
        Ok(())
    }
}

/// In-memory store used when nothing should touch the disk.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Vec<Diagnosis>,
    saves: usize,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the provided entries.
    #[must_use]
    pub fn with_entries(entries: Vec<Diagnosis>) -> Self {
        Self { entries, saves: 0 }
    }

    /// Entries written by the most recent save.
    #[must_use]
    pub fn entries(&self) -> &[Diagnosis] {
        &self.entries
    }

    /// Number of saves performed.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl UnlockStore for MemoryStore {
    fn load(&self) -> Result<Vec<Diagnosis>, StoreError> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[Diagnosis]) -> Result<(), StoreError> {
        self.entries = entries.to_vec();
        self.saves += 1;
        Ok(())
    }
}
