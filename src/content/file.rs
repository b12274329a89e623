//! JSON export source.

use super::{ContentSource, SourceError, extract_posts};
use serde_json::Value;
use std::{fs, path::PathBuf};

/// Reads posts from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContentSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch_posts(&self) -> Result<Vec<Value>, SourceError> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| SourceError::Io(self.path.clone(), e))?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| SourceError::Json(self.path.clone(), e))?;
        extract_posts(value)
    }
}
