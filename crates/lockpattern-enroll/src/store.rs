//! Credential persistence
//!
//! The workflow hands a [`CredentialStore`] the codec output of a confirmed
//! pattern exactly once. The string is opaque to the store.
//!
//! # Example
//!
//! ```rust
//! use lockpattern_core::{GridSize, Pattern, PatternCodec};
//! use lockpattern_enroll::{verify_pattern, CredentialStore, MemoryCredentialStore};
//!
//! let size = GridSize::DEFAULT;
//! let drawn = PatternCodec::deserialize("0124", size).unwrap();
//!
//! let mut store = MemoryCredentialStore::new();
//! store.save("0124").unwrap();
//!
//! assert!(verify_pattern(&store, &drawn, size).unwrap());
//! assert!(!verify_pattern(&store, &Pattern::new(), size).unwrap());
//! ```

use crate::error::{EnrollError, StoreError};
use chrono::{DateTime, Utc};
use lockpattern_core::{GridSize, Pattern, PatternCodec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Persistent home of the enrolled credential
pub trait CredentialStore: Send {
    /// Replace the stored credential
    ///
    /// # Errors
    /// Returns [`StoreError`] if the credential was not persisted
    fn save(&mut self, serialized: &str) -> Result<(), StoreError>;

    /// Remove the stored credential; clearing an empty store succeeds
    ///
    /// # Errors
    /// Returns [`StoreError`] if an existing credential could not be removed
    fn clear(&mut self) -> Result<(), StoreError>;

    /// Stored credential, if any
    ///
    /// # Errors
    /// Returns [`StoreError`] if the store could not be read
    fn load(&self) -> Result<Option<String>, StoreError>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for Box<S> {
    fn save(&mut self, serialized: &str) -> Result<(), StoreError> {
        (**self).save(serialized)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        (**self).clear()
    }

    fn load(&self) -> Result<Option<String>, StoreError> {
        (**self).load()
    }
}

/// In-process store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCredentialStore {
    credential: Option<String>,
    saves: usize,
}

impl MemoryCredentialStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current credential
    #[inline]
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// Number of successful saves
    #[inline]
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&mut self, serialized: &str) -> Result<(), StoreError> {
        self.credential = Some(serialized.to_string());
        self.saves += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.credential = None;
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.credential.clone())
    }
}

/// On-disk credential record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Codec output of the enrolled pattern
    pub pattern: String,
    /// Grid the pattern was enrolled on
    pub grid_size: GridSize,
    /// When the record was written
    pub saved_at: DateTime<Utc>,
}

/// JSON file store
///
/// Writes go to a sibling temporary file that is flushed to disk and then
/// renamed over the record, so a reader sees either the old record or the
/// new one. A failed write removes the temporary file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
    grid_size: GridSize,
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

impl FileCredentialStore {
    /// Store backed by `path` for patterns on a `grid_size` grid
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, grid_size: GridSize) -> Self {
        Self { path: path.into(), grid_size }
    }

    /// Record location
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full record, including metadata
    ///
    /// # Errors
    /// Returns [`StoreError`] if the file exists but cannot be read or decoded
    pub fn load_record(&self) -> Result<Option<CredentialRecord>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: CredentialRecord = serde_json::from_str(&raw)?;
        if record.grid_size != self.grid_size {
            return Err(StoreError::Corrupt(format!(
                "credential enrolled on a {} grid, expected {}",
                record.grid_size, self.grid_size
            )));
        }
        Ok(Some(record))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&mut self, serialized: &str) -> Result<(), StoreError> {
        let record = CredentialRecord {
            pattern: serialized.to_string(),
            grid_size: self.grid_size,
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&record)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        let written = write_synced(&temp, json.as_bytes()).and_then(|()| fs::rename(&temp, &self.path));
        if let Err(err) = written {
            let _ = fs::remove_file(&temp);
            return Err(err.into());
        }
        tracing::debug!(path = %self.path.display(), "credential record written");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "credential record removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.load_record()?.map(|record| record.pattern))
    }
}

/// Check a drawn pattern against the enrolled credential
///
/// Returns `false` when nothing is enrolled.
///
/// # Errors
/// Returns [`EnrollError::StorageFailure`] if the store cannot be read and
/// [`EnrollError::Pattern`] if the stored credential does not decode
pub fn verify_pattern<S>(store: &S, drawn: &Pattern, grid_size: GridSize) -> Result<bool, EnrollError>
where
    S: CredentialStore + ?Sized,
{
    let Some(stored) = store.load()? else {
        tracing::debug!("verification against empty store");
        return Ok(false);
    };
    let enrolled = PatternCodec::deserialize(&stored, grid_size)?;
    let matched = enrolled == *drawn;
    tracing::debug!(matched, "pattern verified");
    Ok(matched)
}
