use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("No release tag found in history and {} declares no version", manifest.display())]
    MissingBaseline { manifest: PathBuf },

    #[error("Manifest error ({}): {message}", path.display())]
    Manifest { message: String, path: PathBuf },

    #[error("Local branch is behind '{remote}', update first")]
    BehindRemote { remote: String },

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a version error for a string that is not `major.minor.patch`
    pub fn invalid_version(version: impl Into<String>, reason: impl Into<String>) -> Self {
        ReleaseError::InvalidVersion {
            version: version.into(),
            reason: reason.into(),
        }
    }

    /// Create a manifest error tied to a file
    pub fn manifest(msg: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        ReleaseError::Manifest {
            message: msg.into(),
            path: path.into(),
        }
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseError::Remote(msg.into())
    }
}
