//! High score persistence
//!
//! A single integer survives between runs. Native builds keep it in a JSON
//! file, the web build in LocalStorage.

use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
use crate::error::RunnerError;

/// Where the best score lives between runs
pub trait HighScoreStore {
    /// Stored high score, 0 when nothing has been saved yet
    fn high_score(&self) -> u32;
    /// Replace the stored high score
    fn set_high_score(&mut self, value: u32);
}

/// On-disk / LocalStorage record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u32,
}

/// In-memory store for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: u32,
    /// Number of `set_high_score` calls
    pub writes: u32,
}

impl MemoryStore {
    pub fn with_high_score(value: u32) -> Self {
        Self { value, writes: 0 }
    }
}

impl HighScoreStore for MemoryStore {
    fn high_score(&self) -> u32 {
        self.value
    }

    fn set_high_score(&mut self, value: u32) {
        self.value = value;
        self.writes += 1;
    }
}

/// JSON file store (native only)
///
/// The value is cached; a failed write is logged and the cache keeps the new
/// score for the rest of the process.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
    record: HighScoreRecord,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    /// Open the store at `path`. A missing file reads as 0.
    pub fn open(path: impl Into<std::path::PathBuf>) -> Result<Self, RunnerError> {
        let path = path.into();
        let record = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str::<HighScoreRecord>(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high score at {}, starting fresh", path.display());
                HighScoreRecord::default()
            }
            Err(e) => return Err(e.into()),
        };
        log::info!("Loaded high score {}", record.high_score);
        Ok(Self { path, record })
    }

    fn save(&self) -> Result<(), RunnerError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.record)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HighScoreStore for FileStore {
    fn high_score(&self) -> u32 {
        self.record.high_score
    }

    fn set_high_score(&mut self, value: u32) {
        self.record.high_score = value;
        match self.save() {
            Ok(()) => log::debug!("High score {} saved to {}", value, self.path.display()),
            Err(e) => log::warn!("Failed to save high score: {}", e),
        }
    }
}

/// LocalStorage store (web only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore {
    record: HighScoreRecord,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "ledge_runner_highscore";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }

    /// Load from LocalStorage, starting at 0 when absent or unreadable
    pub fn load() -> Self {
        if let Some(storage) = Self::storage() {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(record) = serde_json::from_str::<HighScoreRecord>(&json) {
                    log::info!("Loaded high score {}", record.high_score);
                    return Self { record };
                }
            }
        }

        log::info!("No high score found, starting fresh");
        Self::default()
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn high_score(&self) -> u32 {
        self.record.high_score
    }

    fn set_high_score(&mut self, value: u32) {
        self.record.high_score = value;
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, high score not saved");
            return;
        };
        if let Ok(json) = serde_json::to_string(&self.record) {
            if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                log::warn!("Failed to save high score");
            }
        }
    }
}
