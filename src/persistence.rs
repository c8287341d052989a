//! Highest-day record, the only state that survives a session

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::Result;

/// Storage for the highest day reached
pub trait HighestDayStore: Send {
    /// Stored record; 0 when nothing was stored yet
    fn load(&self) -> Result<u32>;
    fn save(&mut self, day: u32) -> Result<()>;
}

/// In-process store, used by tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    day: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a record
    pub fn with_day(day: u32) -> Self {
        Self { day }
    }
}

impl HighestDayStore for MemoryStore {
    fn load(&self) -> Result<u32> {
        Ok(self.day)
    }

    fn save(&mut self, day: u32) -> Result<()> {
        self.day = day;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    highest_day: u32,
}

/// JSON file holding `{"highest_day": n}`
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
}

impl HighestDayStore for JsonFileStore {
    fn load(&self) -> Result<u32> {
        if !self.path.exists() {
            return Ok(0);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let record: Record = serde_json::from_str(&content)?;
        Ok(record.highest_day)
    }

    fn save(&mut self, day: u32) -> Result<()> {
        let json = serde_json::to_string(&Record { highest_day: day })?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("restaurant_rush_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), 0);
        store.save(7).unwrap();
        assert_eq!(store.load().unwrap(), 7);
    }

    #[test]
    fn test_json_store_missing_file_is_zero() {
        let store = JsonFileStore::new(temp_path("missing"));
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_json_store_persists() {
        let path = temp_path("persist");
        let mut store = JsonFileStore::new(&path);
        store.save(12).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load().unwrap(), 12);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_json_store_corrupt_file_errors() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(store.load().is_err());
        let _ = std::fs::remove_file(&path);
    }
}
