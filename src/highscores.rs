//! High score persistence
//!
//! A single integer stored under [`STORAGE_KEY`]. Persistence is best-effort:
//! the session logs store failures and carries on.
//!
//! - `MemoryStore`: tests and headless runs
//! - `FileStore`: JSON file in the user config dir (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)

use thiserror::Error;

use crate::consts::STORAGE_KEY;

/// Why the high score could not be read or written
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score storage unavailable: {0}")]
    Unavailable(String),
    #[error("high score storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored high score is malformed: {0}")]
    Parse(String),
}

/// Get/set one persisted integer
pub trait HighScoreStore {
    /// `Ok(None)` when nothing has been stored yet
    fn get(&self) -> Result<Option<u64>, StoreError>;
    fn set(&mut self, value: u64) -> Result<(), StoreError>;
}

impl<T: HighScoreStore + ?Sized> HighScoreStore for Box<T> {
    fn get(&self) -> Result<Option<u64>, StoreError> {
        (**self).get()
    }

    fn set(&mut self, value: u64) -> Result<(), StoreError> {
        (**self).set(value)
    }
}

/// In-memory store; counts writes so callers can verify persistence rules
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u64>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: u64) -> Self {
        Self {
            value: Some(value),
            writes: 0,
        }
    }

    /// Number of successful `set` calls
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl HighScoreStore for MemoryStore {
    fn get(&self) -> Result<Option<u64>, StoreError> {
        Ok(self.value)
    }

    fn set(&mut self, value: u64) -> Result<(), StoreError> {
        self.value = Some(value);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::collections::BTreeMap;
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{HighScoreStore, STORAGE_KEY, StoreError};

    const FILENAME: &str = "highscore.json";

    /// JSON object `{ "<key>": <score> }` on disk
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// `$XDG_CONFIG_HOME/blortnix/highscore.json`, falling back to
        /// `~/.config` and then the working directory
        pub fn in_config_dir() -> Self {
            let base = match std::env::var("XDG_CONFIG_HOME") {
                Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
                _ => std::env::var("HOME")
                    .map(|h| PathBuf::from(h).join(".config"))
                    .unwrap_or_else(|_| PathBuf::from(".")),
            };
            Self::new(base.join("blortnix").join(FILENAME))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_entries(&self) -> Result<Option<BTreeMap<String, u64>>, StoreError> {
            let content = match fs::read_to_string(&self.path) {
                Ok(c) => c,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(e.into()),
            };
            serde_json::from_str(&content)
                .map(Some)
                .map_err(|e| StoreError::Parse(e.to_string()))
        }
    }

    impl HighScoreStore for FileStore {
        fn get(&self) -> Result<Option<u64>, StoreError> {
            Ok(self
                .read_entries()?
                .and_then(|entries| entries.get(STORAGE_KEY).copied()))
        }

        fn set(&mut self, value: u64) -> Result<(), StoreError> {
            // A corrupt file is overwritten rather than blocking the save
            let mut entries = self.read_entries().ok().flatten().unwrap_or_default();
            entries.insert(STORAGE_KEY.to_string(), value);

            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string_pretty(&entries)
                .map_err(|e| StoreError::Parse(e.to_string()))?;
            fs::write(&self.path, json)?;
            log::debug!("High score {} written to {}", value, self.path.display());
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod local {
    use super::{HighScoreStore, STORAGE_KEY, StoreError};

    /// Browser LocalStorage, value kept as a decimal string
    #[derive(Debug, Clone, Default)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        fn storage() -> Result<web_sys::Storage, StoreError> {
            web_sys::window()
                .ok_or_else(|| StoreError::Unavailable("no window".into()))?
                .local_storage()
                .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?
                .ok_or_else(|| StoreError::Unavailable("LocalStorage disabled".into()))
        }
    }

    impl HighScoreStore for LocalStorageStore {
        fn get(&self) -> Result<Option<u64>, StoreError> {
            let item = Self::storage()?
                .get_item(STORAGE_KEY)
                .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?;
            item.map(|s| {
                s.trim()
                    .parse::<u64>()
                    .map_err(|e| StoreError::Parse(e.to_string()))
            })
            .transpose()
        }

        fn set(&mut self, value: u64) -> Result<(), StoreError> {
            Self::storage()?
                .set_item(STORAGE_KEY, &value.to_string())
                .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?;
            log::info!("High score saved to LocalStorage");
            Ok(())
        }
    }
}
