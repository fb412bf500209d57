//! Single-file JSON slot.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::slot::StateSlot;
use crate::error::PersistenceError;

/// Stores the record as one JSON file, replaced atomically on write.
#[derive(Debug, Clone)]
pub struct JsonFileSlot {
    path: PathBuf,
}

impl JsonFileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl StateSlot for JsonFileSlot {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::io(&self.path, e)),
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
        }
        let tmp = self.tmp_path();
        fs::write(&tmp, contents).map_err(|e| PersistenceError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| PersistenceError::io(&self.path, e))?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
