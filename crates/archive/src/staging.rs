//! Staging area for validated uploads.
//!
//! Uploads are streamed to disk chunk by chunk as they arrive from the
//! multipart reader, so request bodies are never buffered whole in memory.
//! Staged files are transient: the request that created them removes them
//! once the archive is built (or the build fails).

use crate::error::{ArchiveError, ArchiveResult};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// A validated upload persisted under the staging directory.
#[derive(Clone, Debug)]
pub struct StagedFile {
    /// Sanitized name, used verbatim as the archive entry name.
    pub name: String,
    /// Location of the staged content on disk.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
}

/// Handle on the staging directory.
pub struct Staging {
    root: PathBuf,
}

impl Staging {
    /// Create a staging handle, ensuring the directory exists.
    pub async fn new(root: impl AsRef<Path>) -> ArchiveResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// The staging directory root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open a streaming writer for a staged file.
    ///
    /// `name` must already be sanitized; names with path separators or
    /// traversal sequences are rejected outright rather than resolved.
    pub async fn create(&self, name: &str) -> ArchiveResult<StagedWriter> {
        validate_entry_name(name)?;
        let path = self.root.join(name);
        let file = fs::File::create(&path).await?;
        Ok(StagedWriter {
            file,
            path,
            name: name.to_string(),
            written: 0,
        })
    }

    /// Delete a staged file. Missing files are not an error.
    pub async fn remove(&self, staged: &StagedFile) -> ArchiveResult<()> {
        match fs::remove_file(&staged.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ArchiveError::Io(e)),
        }
    }
}

/// Incremental writer for one staged upload.
pub struct StagedWriter {
    file: fs::File,
    path: PathBuf,
    name: String,
    written: u64,
}

impl StagedWriter {
    /// Append one chunk of upload content.
    pub async fn write_chunk(&mut self, chunk: Bytes) -> ArchiveResult<()> {
        self.file.write_all(&chunk).await?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Flush and close the writer, yielding the staged file record.
    ///
    /// On flush failure the partial file is removed before the error is
    /// returned.
    pub async fn finish(mut self) -> ArchiveResult<StagedFile> {
        if let Err(e) = self.file.flush().await {
            self.discard().await;
            return Err(ArchiveError::Io(e));
        }
        Ok(StagedFile {
            name: self.name,
            path: self.path,
            size: self.written,
        })
    }

    /// Abandon the upload, removing any partially written content.
    pub async fn discard(self) {
        drop(self.file);
        if let Err(e) = fs::remove_file(&self.path).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove abandoned staged file"
            );
        }
    }
}

/// Reject names that could address anything outside a single directory.
pub(crate) fn validate_entry_name(name: &str) -> ArchiveResult<()> {
    if name.is_empty()
        || name.starts_with('.')
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
    {
        return Err(ArchiveError::InvalidEntryName(name.to_string()));
    }
    Ok(())
}
