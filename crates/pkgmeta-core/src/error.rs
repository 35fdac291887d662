use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes, surfaced in `--json` output.
pub mod codes {
    pub const DUPLICATE_KEY: &str = "DUPLICATE_KEY";
    pub const KEY_NOT_FOUND: &str = "KEY_NOT_FOUND";
    pub const DUPLICATE_DEPENDENCY: &str = "DUPLICATE_DEPENDENCY";
    pub const MANIFEST_MALFORMED: &str = "MANIFEST_MALFORMED";
    pub const MANIFEST_NOT_OBJECT: &str = "MANIFEST_NOT_OBJECT";
    pub const MANIFEST_READ_FAILED: &str = "MANIFEST_READ_FAILED";
    pub const IO_ERROR: &str = "IO_ERROR";
    pub const OTHER: &str = "OTHER";
}

/// Core error type for pkgmeta operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Key already present: {key}")]
    DuplicateKey { key: String },

    #[error("Key not found: {key}")]
    KeyNotFound { key: String },

    #[error("Dependency '{name}' is already present in {facet}")]
    DuplicateDependency { name: String, facet: &'static str },

    #[error("Failed to parse manifest at {path}: {source}")]
    MalformedManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Manifest at {path} must be a JSON object")]
    ManifestNotObject { path: PathBuf },

    #[error("Failed to read manifest at {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    #[must_use]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    pub(crate) fn duplicate_key(key: impl ToString) -> Self {
        Self::DuplicateKey {
            key: key.to_string(),
        }
    }

    pub(crate) fn key_not_found(key: impl ToString) -> Self {
        Self::KeyNotFound {
            key: key.to_string(),
        }
    }

    /// Get the stable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateKey { .. } => codes::DUPLICATE_KEY,
            Self::KeyNotFound { .. } => codes::KEY_NOT_FOUND,
            Self::DuplicateDependency { .. } => codes::DUPLICATE_DEPENDENCY,
            Self::MalformedManifest { .. } => codes::MANIFEST_MALFORMED,
            Self::ManifestNotObject { .. } => codes::MANIFEST_NOT_OBJECT,
            Self::ManifestRead { .. } => codes::MANIFEST_READ_FAILED,
            Self::Io(_) => codes::IO_ERROR,
            Self::Other(_) => codes::OTHER,
        }
    }
}
