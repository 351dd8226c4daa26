//! Byte-level persistence for the habit snapshot.
//!
//! Adapters only move opaque bytes; encoding lives in `snapshot`.
//! A save always replaces the whole stored snapshot.

use std::path::{Path, PathBuf};

use crate::error::PersistenceError;

pub trait PersistenceAdapter {
    /// Stored bytes, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<Vec<u8>>, PersistenceError>;

    /// Replace the stored snapshot with `bytes`.
    fn save(&mut self, bytes: &[u8]) -> Result<(), PersistenceError>;

    /// Move an undecodable snapshot out of the way before it is replaced.
    fn set_aside(&mut self) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// Snapshot kept in a single file.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so an interrupted save leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileAdapter {
    path: PathBuf,
}

impl FileAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/habits.json`
    pub fn open_default() -> Result<Self, crate::error::ConfigError> {
        Ok(Self::new(super::data_dir()?.join("habits.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// `habits.json` -> `habits.json.corrupt`
    pub fn set_aside_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".corrupt");
        PathBuf::from(name)
    }
}

impl PersistenceAdapter for FileAdapter {
    fn load(&self) -> Result<Option<Vec<u8>>, PersistenceError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistenceError::ReadFailed {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn save(&mut self, bytes: &[u8]) -> Result<(), PersistenceError> {
        let write_failed = |source| PersistenceError::WriteFailed {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_failed)?;
        }
        let tmp = self.temp_path();
        std::fs::write(&tmp, bytes).map_err(write_failed)?;
        std::fs::rename(&tmp, &self.path).map_err(write_failed)?;
        Ok(())
    }

    fn set_aside(&mut self) -> Result<(), PersistenceError> {
        let target = self.set_aside_path();
        match std::fs::rename(&self.path, &target) {
            Ok(()) => {
                tracing::warn!(path = %target.display(), "unreadable habit snapshot set aside");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistenceError::WriteFailed {
                path: target,
                source,
            }),
        }
    }
}

/// Snapshot held in memory. Saves can be made to fail for exercising the
/// write-error path.
#[derive(Debug, Clone, Default)]
pub struct MemoryAdapter {
    bytes: Option<Vec<u8>>,
    set_aside: Option<Vec<u8>>,
    fail_saves: bool,
    saves: usize,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Some(bytes.into()),
            ..Self::default()
        }
    }

    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    /// Bytes moved away by the last `set_aside`.
    pub fn set_aside_bytes(&self) -> Option<&[u8]> {
        self.set_aside.as_deref()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl PersistenceAdapter for MemoryAdapter {
    fn load(&self) -> Result<Option<Vec<u8>>, PersistenceError> {
        Ok(self.bytes.clone())
    }

    fn save(&mut self, bytes: &[u8]) -> Result<(), PersistenceError> {
        if self.fail_saves {
            return Err(PersistenceError::WriteFailed {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::other("save disabled"),
            });
        }
        self.bytes = Some(bytes.to_vec());
        self.saves += 1;
        Ok(())
    }

    fn set_aside(&mut self) -> Result<(), PersistenceError> {
        if let Some(bytes) = self.bytes.take() {
            self.set_aside = Some(bytes);
        }
        Ok(())
    }
}
