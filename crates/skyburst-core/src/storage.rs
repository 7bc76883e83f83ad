use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The only engine state that survives between runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Counters {
    pub missile_count: u32,
    pub sidewinder_count: u32,
    pub has_extra_life: bool,
    pub double_time: bool,
}

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Format(serde_json::Error),
    Unavailable(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "counter storage I/O failed: {e}"),
            Self::Format(e) => write!(f, "counter storage is malformed: {e}"),
            Self::Unavailable(m) => write!(f, "counter storage unavailable: {m}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Format(e) => Some(e),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Format(e)
    }
}

/// Persistence seam for [`Counters`]. Writes are assumed atomic.
pub trait CounterStore {
    fn load(&self) -> Result<Counters, StorageError>;
    fn save(&mut self, counters: &Counters) -> Result<(), StorageError>;
}

/// Process-local store, used by tests and the headless runner.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    counters: Counters,
    saves: usize,
}

impl MemoryStore {
    pub fn new(counters: Counters) -> Self {
        Self { counters, saves: 0 }
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Number of successful `save` calls.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl CounterStore for MemoryStore {
    fn load(&self) -> Result<Counters, StorageError> {
        Ok(self.counters)
    }

    fn save(&mut self, counters: &Counters) -> Result<(), StorageError> {
        self.counters = *counters;
        self.saves += 1;
        Ok(())
    }
}

/// JSON file store. Saves go to a sibling temp file which is then renamed
/// over the target, so a crash mid-write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl CounterStore for JsonFileStore {
    /// A missing file is a fresh install, not an error.
    fn load(&self) -> Result<Counters, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Counters::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, counters: &Counters) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(counters)?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
