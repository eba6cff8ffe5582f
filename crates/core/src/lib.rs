//! Core domain types and shared logic for the baler archive service.
//!
//! This crate defines the canonical data model used across the other crates:
//! - Archive format selection
//! - Upload filename sanitization and filtering
//! - Application configuration
//! - Core error type

pub mod config;
pub mod error;
pub mod format;
pub mod sanitize;

pub use error::{Error, Result};
pub use format::ArchiveFormat;
pub use sanitize::{accepts_upload, sanitize_file_name};

/// Default maximum request body size: 16 MiB.
pub const DEFAULT_MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Default maximum number of files archived per client.
pub const DEFAULT_MAX_FILES_PER_CLIENT: u64 = 5;
