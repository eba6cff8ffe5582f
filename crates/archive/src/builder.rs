//! Archive assembly.
//!
//! One archive is produced per request. The codec writes to a hidden
//! temporary path inside the output directory and the finished archive is
//! renamed into place, so a partially written archive is never visible
//! under its final name.

use crate::error::{ArchiveError, ArchiveResult};
use crate::staging::{StagedFile, validate_entry_name};
use baler_core::ArchiveFormat;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;
use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

/// Builds archives in the output directory.
pub struct ArchiveBuilder {
    output_dir: PathBuf,
}

impl ArchiveBuilder {
    /// Create a builder, ensuring the output directory exists.
    pub async fn new(output_dir: impl AsRef<Path>) -> ArchiveResult<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir).await?;
        Ok(Self { output_dir })
    }

    /// The output directory root.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generate a fresh output file name for the given format.
    ///
    /// Each request gets its own name so concurrent builds never contend
    /// on a shared destination.
    pub fn fresh_output_name(format: ArchiveFormat) -> String {
        format!(
            "archive-{}.{}",
            Uuid::new_v4().simple(),
            format.extension()
        )
    }

    /// Assemble `files` into an archive named `file_name` in the output
    /// directory, returning the final path.
    ///
    /// Entry names are validated again here; the builder never trusts its
    /// callers to have sanitized them. On any codec or I/O failure the
    /// temporary file is removed and no archive appears under `file_name`.
    pub async fn build(
        &self,
        files: &[StagedFile],
        format: ArchiveFormat,
        file_name: &str,
    ) -> ArchiveResult<PathBuf> {
        validate_entry_name(file_name)?;
        for staged in files {
            validate_entry_name(&staged.name)?;
        }

        let final_path = self.output_dir.join(file_name);
        let temp_path = self.output_dir.join(format!(".tmp.{}", Uuid::new_v4()));

        let entries = files.len();
        let files = files.to_vec();
        let codec_path = temp_path.clone();
        let result = tokio::task::spawn_blocking(move || {
            write_archive(&codec_path, &files, format)
        })
        .await
        .map_err(|e| {
            ArchiveError::Io(io::Error::other(format!("spawn_blocking failed: {e}")))
        })?;

        if let Err(e) = result {
            if let Err(cleanup) = fs::remove_file(&temp_path).await
                && cleanup.kind() != io::ErrorKind::NotFound
            {
                tracing::warn!(
                    path = %temp_path.display(),
                    error = %cleanup,
                    "failed to remove temporary archive after build failure"
                );
            }
            return Err(e);
        }

        fs::rename(&temp_path, &final_path).await?;
        tracing::debug!(
            archive = %final_path.display(),
            entries,
            format = %format,
            "archive assembled"
        );
        Ok(final_path)
    }
}

/// Run the synchronous codec for the requested format.
fn write_archive(path: &Path, files: &[StagedFile], format: ArchiveFormat) -> ArchiveResult<()> {
    let out = File::create(path)?;
    match format {
        ArchiveFormat::Zip => write_zip(out, files),
        ArchiveFormat::Tar => write_tar(out, files),
    }
}

/// ZIP codec: deflate-compressed entries, zip64 enabled for large inputs.
/// Entries carry only the staged base name, never directory structure.
fn write_zip(out: File, files: &[StagedFile]) -> ArchiveResult<()> {
    let mut zip = ZipWriter::new(out);
    let options: FileOptions<()> = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(true);

    for staged in files {
        zip.start_file(staged.name.as_str(), options)?;
        let mut input = File::open(&staged.path)?;
        io::copy(&mut input, &mut zip)?;
    }

    let out = zip.finish()?;
    out.sync_all()?;
    Ok(())
}

/// TAR codec: uncompressed, entry metadata taken from the staged file.
fn write_tar(out: File, files: &[StagedFile]) -> ArchiveResult<()> {
    let mut tar = tar::Builder::new(out);

    for staged in files {
        tar.append_path_with_name(&staged.path, &staged.name)?;
    }

    let out = tar.into_inner()?;
    out.sync_all()?;
    Ok(())
}
