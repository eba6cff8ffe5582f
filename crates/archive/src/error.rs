//! Archive error types.

use thiserror::Error;

/// Errors raised while staging uploads or assembling archives.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip codec error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("invalid entry name: {0}")]
    InvalidEntryName(String),
}

/// Result type for staging and archive operations.
pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;
