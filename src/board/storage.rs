//! Key-value storage backing the board, in the shape of browser local storage.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::BoardError;

/// Durable string storage keyed by name.
pub trait LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, BoardError>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), BoardError>;
}

/// Storage that lives only as long as the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, BoardError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), BoardError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct DirStorage {
    dir: PathBuf,
}

impl DirStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn item_path(&self, key: &str) -> Result<PathBuf, BoardError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(BoardError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl LocalStorage for DirStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, BoardError> {
        match fs::read_to_string(self.item_path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), BoardError> {
        let path = self.item_path(key)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(path, value)?;
        Ok(())
    }
}
