// src/error.rs

use thiserror::Error;

/// Core error types for lazuli
#[derive(Error, Debug)]
pub enum Error {
    /// Package name failed validation (empty or non-alphanumeric)
    #[error("Invalid package name: {0}")]
    InvalidInput(String),

    /// Operation requires elevated privileges
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// No bundle for the requested package (and no fallback succeeded)
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    /// A bundle's dependency command exited non-zero
    #[error("Dependency command failed: {command}\n{output}")]
    DependencyFailure { command: String, output: String },

    /// Repository sync (git clone/pull) failed
    #[error("Repository sync failed: {0}")]
    SyncFailure(String),

    /// Package is not tracked by this tool's registry
    #[error("Package '{0}' is not managed by lazuli")]
    NotManaged(String),

    /// Registry document could not be written
    #[error("Failed to persist registry: {0}")]
    PersistenceFailure(String),

    /// Another invocation holds the registry lock
    #[error("Registry is busy: {0}")]
    Busy(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Process exit code for this error.
    ///
    /// Each failure class gets a distinct code so scripts can branch on
    /// the outcome without parsing stderr.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidInput(_) => 2,
            Error::PermissionDenied(_) => 3,
            Error::PackageNotFound(_) => 4,
            Error::DependencyFailure { .. } => 5,
            Error::SyncFailure(_) => 6,
            Error::NotManaged(_) => 7,
            Error::PersistenceFailure(_) => 8,
            Error::Busy(_) => 9,
            Error::Io(_) => 1,
        }
    }
}

/// Result type alias using lazuli's Error type
pub type Result<T> = std::result::Result<T, Error>;
