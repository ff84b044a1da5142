//! File-backed navigation location
//!
//! The current article path is stored as a small JSON record in the state
//! directory so a later run can resume or share it.

use crate::errors::Result;
use crate::session::Navigator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Stored location record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub path: String,
    pub updated_at: DateTime<Utc>,
}

/// Navigator persisting its location to a JSON file
#[derive(Debug, Clone)]
pub struct FileNavigator {
    file: PathBuf,
}

impl FileNavigator {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Full stored record, if present
    pub fn record(&self) -> Result<Option<LocationRecord>> {
        if !self.file.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.file)?;
        let record: LocationRecord = serde_json::from_str(&contents)?;
        Ok(Some(record))
    }
}

impl Navigator for FileNavigator {
    fn replace(&self, path: &str) -> Result<()> {
        if let Some(parent) = self.file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let record = LocationRecord {
            path: path.to_string(),
            updated_at: Utc::now(),
        };
        std::fs::write(&self.file, serde_json::to_string_pretty(&record)?)?;
        Ok(())
    }

    fn current(&self) -> Result<Option<String>> {
        Ok(self.record()?.map(|r| r.path))
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
