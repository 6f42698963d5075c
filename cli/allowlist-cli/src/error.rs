use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AllowlistError {
    #[error("Invalid address {value:?}: {reason}")]
    InvalidAddress { value: String, reason: &'static str },

    #[error("Duplicate address detected: {0}")]
    DuplicateAddress(String),

    #[error("Allowlist is empty")]
    EmptyAllowlist,

    #[error("Address not found in allowlist: {0}")]
    AddressNotFound(String),

    #[error("Invalid chunk size {0}: must be greater than zero")]
    InvalidChunkSize(usize),

    #[error("Invalid hash {value:?}: {reason}")]
    InvalidHash { value: String, reason: String },

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AllowlistError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AllowlistError>;
