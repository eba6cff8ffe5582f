//! Staging and archive assembly for the baler service.
//!
//! This crate owns the disk-facing half of the upload pipeline:
//! - Streaming validated uploads into a staging directory
//! - Assembling staged files into a ZIP or TAR archive
//! - Atomic publication of finished archives into the output directory

pub mod builder;
pub mod error;
pub mod staging;

pub use builder::ArchiveBuilder;
pub use error::{ArchiveError, ArchiveResult};
pub use staging::{StagedFile, StagedWriter, Staging};
