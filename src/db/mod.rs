//! Document storage.
//!
//! The whole document is loaded before every operation and written back after every mutation.
//! Stores are synchronous; [`Repository`] runs them on the blocking thread pool.

mod repository;

pub use repository::*;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::errors::AppError;
use crate::models::Document;

/// Where the document lives.
pub trait DocumentStore: Send + Sync {
    /// Read the full document.
    fn load(&self) -> Result<Document, AppError>;

    /// Replace the full document.
    fn save(&self, document: &Document) -> Result<(), AppError>;
}

/// Pretty-printed JSON file on disk.
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

    /// Create the file with an empty document if it does not exist yet.
    pub async fn init(&self) -> Result<(), AppError> {
        if tokio::fs::try_exists(&self.path).await? {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        tracing::info!("Creating new data file at {:?}", self.path);
        let data = serde_json::to_string_pretty(&Document::default())?;
        tokio::fs::write(&self.path, data).await?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Result<Document, AppError> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, document: &Document) -> Result<(), AppError> {
        let data = serde_json::to_string_pretty(document)?;
        let temp = self.temp_path();

        fs::write(&temp, data)?;
        if let Err(e) = fs::rename(&temp, &self.path) {
            fs::remove_file(&temp).ok();
            return Err(e.into());
        }

        tracing::debug!("Document written to {:?}", self.path);
        Ok(())
    }
}

/// In-memory document, for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Document>,
}

impl MemoryStore {
    pub fn new(document: Document) -> Self {
        Self {
            document: Mutex::new(document),
        }
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<Document, AppError> {
        self.document
            .lock()
            .map(|doc| doc.clone())
            .map_err(|_| AppError::Internal("Memory store lock poisoned".to_string()))
    }

    fn save(&self, document: &Document) -> Result<(), AppError> {
        let mut current = self
            .document
            .lock()
            .map_err(|_| AppError::Internal("Memory store lock poisoned".to_string()))?;
        *current = document.clone();
        Ok(())
    }
}
