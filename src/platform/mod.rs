//! Platform abstraction layer
//!
//! Key/value storage for persisted data:
//! - LocalStorage on web
//! - One JSON file per key on native (`LANE_HOPPER_DATA_DIR`, default: working dir)

use crate::persistence::PersistenceError;

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

/// Environment variable overriding the native storage directory
pub const DATA_DIR_ENV: &str = "LANE_HOPPER_DATA_DIR";

/// Handle to the platform's key/value store
#[derive(Debug, Clone)]
pub struct Storage {
    #[cfg(not(target_arch = "wasm32"))]
    dir: PathBuf,
}

impl Storage {
    /// Default store for this platform
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open() -> Self {
        let dir = std::env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { dir }
    }

    /// Store rooted at an explicit directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Read a value; a missing key is `Ok(None)`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Write a value (temp file, then rename over the old one)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn open() -> Self {
        Self {}
    }

    #[cfg(target_arch = "wasm32")]
    fn local_storage() -> Result<web_sys::Storage, PersistenceError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(PersistenceError::Unavailable)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Self::local_storage()?
            .get_item(key)
            .map_err(|_| PersistenceError::Unavailable)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        Self::local_storage()?
            .set_item(key, value)
            .map_err(|_| PersistenceError::Unavailable)
    }
}

/// Read from the default store
pub fn get_item(key: &str) -> Result<Option<String>, PersistenceError> {
    Storage::open().get_item(key)
}

/// Write to the default store
pub fn set_item(key: &str, value: &str) -> Result<(), PersistenceError> {
    Storage::open().set_item(key, value)
}
