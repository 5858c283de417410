// src/registry/mod.rs

//! Registry of packages installed by this tool
//!
//! The registry is the sole source of truth for "is this package managed
//! by us." It is a single JSON document holding one record per installed
//! package, loaded once at the start of an install/remove, mutated in
//! memory, and persisted once at the end.
//!
//! - A missing or corrupt document loads as an empty registry (with a
//!   warning); the tool stays usable over strict consistency.
//! - Saves go through a temp file in the same directory followed by a
//!   rename, so a crash mid-write cannot truncate the document.
//! - An advisory file lock guards the load+mutate+save window against a
//!   second concurrent invocation.

use crate::error::{Error, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How a package was installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallMethod {
    /// Artifact copied into the install directory
    Copy,
    /// Shell alias pointing at the artifact in the repository checkout
    Alias,
}

/// One entry per installed package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub name: String,
    pub method: InstallMethod,
    /// Shell configuration file an alias install modified.
    /// Present iff `method` is `Alias`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_file: Option<PathBuf>,
}

/// In-memory view of the registry document
#[derive(Debug)]
pub struct Registry {
    path: PathBuf,
    records: Vec<PackageRecord>,
}

impl Registry {
    /// Load the registry from `path`.
    ///
    /// A missing document is an empty registry. A document that fails to
    /// parse is reported with a warning and also treated as empty; a
    /// corrupt registry "forgets" prior installs rather than bricking
    /// the tool.
    pub fn load(path: &Path) -> Self {
        let records = match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Vec<PackageRecord>>(&contents) {
                Ok(records) => records,
                Err(e) => {
                    warn!(
                        "Registry at {} is corrupt ({}); treating as empty",
                        path.display(),
                        e
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No registry at {}, starting empty", path.display());
                Vec::new()
            }
            Err(e) => {
                warn!(
                    "Registry at {} is unreadable ({}); treating as empty",
                    path.display(),
                    e
                );
                Vec::new()
            }
        };

        Self {
            path: path.to_path_buf(),
            records,
        }
    }

    /// Persist the full record collection, overwriting the document.
    ///
    /// The document is written to a temp file in the registry directory
    /// and renamed into place. Any failure is surfaced as
    /// `PersistenceFailure`; data loss on a failed save must not be
    /// silent.
    pub fn save(&self) -> Result<()> {
        let parent = self.path.parent().unwrap_or(Path::new("."));
        fs::create_dir_all(parent).map_err(|e| {
            Error::PersistenceFailure(format!(
                "Failed to create registry directory {}: {}",
                parent.display(),
                e
            ))
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| {
            Error::PersistenceFailure(format!("Failed to create temp registry file: {}", e))
        })?;

        let json = serde_json::to_string_pretty(&self.records).map_err(|e| {
            Error::PersistenceFailure(format!("Failed to serialize registry: {}", e))
        })?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.write_all(b"\n"))
            .map_err(|e| {
                Error::PersistenceFailure(format!("Failed to write registry: {}", e))
            })?;

        tmp.persist(&self.path).map_err(|e| {
            Error::PersistenceFailure(format!(
                "Failed to replace registry at {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(
            "Persisted {} record(s) to {}",
            self.records.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Linear lookup by package name.
    pub fn find(&self, name: &str) -> Option<&PackageRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Insert a record, replacing any prior record for the same name.
    pub fn upsert(&mut self, record: PackageRecord) {
        self.records.retain(|r| r.name != record.name);
        self.records.push(record);
    }

    /// Remove and return the record for `name`, if present.
    pub fn remove(&mut self, name: &str) -> Option<PackageRecord> {
        let index = self.records.iter().position(|r| r.name == name)?;
        Some(self.records.remove(index))
    }

    /// All records, in insertion order.
    pub fn records(&self) -> &[PackageRecord] {
        &self.records
    }
}

/// Advisory lock guarding the registry for one load+mutate+save window.
///
/// The lock is released when the guard is dropped. A second invocation
/// that finds the lock held fails fast with `Busy` instead of racing.
pub struct RegistryLock {
    // Kept open; the flock is released when the handle closes.
    _file: File,
}

impl RegistryLock {
    /// Try to take the exclusive lock at `path`, without blocking.
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::PersistenceFailure(format!(
                    "Failed to create lock directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = File::create(path)?;
        file.try_lock_exclusive().map_err(|_| {
            Error::Busy(format!(
                "Another lazuli invocation holds {}",
                path.display()
            ))
        })?;

        debug!("Acquired registry lock at {}", path.display());
        Ok(Self { _file: file })
    }
}
