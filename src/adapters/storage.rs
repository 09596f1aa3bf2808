use crate::core::Storage;
use crate::utils::error::{PnrError, Result};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One `<key>.json` file per key under `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(PnrError::StorageError {
                key: key.to_string(),
                message: "keys may only contain letters, digits, '_' and '-'".to_string(),
            });
        }
        Ok(Path::new(&self.base_path).join(format!("{}.json", key)))
    }
}

impl Storage for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let full_path = self.key_path(key)?;
        match fs::read_to_string(&full_path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let full_path = self.key_path(key)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, value)?;
        Ok(())
    }
}

/// 測試與嵌入用的記憶體儲存
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| PnrError::StorageError {
            key: key.to_string(),
            message: "storage lock poisoned".to_string(),
        })?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| PnrError::StorageError {
            key: key.to_string(),
            message: "storage lock poisoned".to_string(),
        })?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
