//! Archive creation: multipart intake, staging, and assembly.

use crate::error::{ApiError, ApiResult};
use crate::quota;
use crate::state::AppState;
use axum::extract::multipart::{Field, Multipart};
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::response::Redirect;
use baler_archive::{ArchiveBuilder, StagedFile};
use baler_core::ArchiveFormat;
use baler_core::sanitize::{accepts_upload, sanitize_file_name};
use std::net::SocketAddr;

/// Multipart field carrying file payloads.
const FILES_FIELD: &str = "files";
/// Multipart field naming the requested archive format.
const FORMAT_FIELD: &str = "format";

/// Outcome of multipart intake.
enum IntakeOutcome {
    /// The request carried no file parts at all.
    NoFiles,
    /// An archive was assembled from the staged files.
    Archived { file_name: String, archived: u64 },
}

/// Accept a batch of uploaded files and bundle them into one archive.
///
/// The quota gate runs before any I/O. File parts are streamed to the
/// staging area as they arrive, the archive is assembled from the staged
/// paths, and the client is redirected to the download page. Staged
/// content is removed before the response is returned, whether the build
/// succeeded or not.
pub async fn create_archive(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResult<Redirect> {
    let client = quota::client_id(&headers, addr, state.config.quota.trust_forwarded_headers);
    let max_files = state.config.quota.max_files_per_client;

    // Deny only when the stored count already exceeds the maximum, so a
    // client may finish one batch past the nominal limit.
    let recorded = state.quota.recorded(&client).await;
    if recorded > max_files {
        tracing::info!(
            client = %client,
            recorded,
            max_files,
            "upload denied: quota exceeded"
        );
        return Err(ApiError::QuotaExceeded { max: max_files });
    }

    let mut staged: Vec<StagedFile> = Vec::new();
    let result = intake_and_build(&state, &mut multipart, &mut staged).await;

    // Staged content is transient regardless of how the build went.
    for file in &staged {
        if let Err(e) = state.staging.remove(file).await {
            tracing::warn!(
                file = %file.path.display(),
                error = %e,
                "failed to remove staged file"
            );
        }
    }

    match result? {
        IntakeOutcome::NoFiles => Ok(Redirect::to("/")),
        IntakeOutcome::Archived {
            file_name,
            archived,
        } => {
            let total = state.quota.record(&client, archived).await;
            tracing::info!(
                client = %client,
                archived,
                total,
                archive = %file_name,
                "archive created"
            );
            Ok(Redirect::to(&format!("/download_page/{file_name}")))
        }
    }
}

/// Drain the multipart stream, staging accepted file parts, then assemble
/// the archive.
///
/// Staged files are pushed into `staged` as they are written so the caller
/// can clean them up even when this returns an error.
async fn intake_and_build(
    state: &AppState,
    multipart: &mut Multipart,
    staged: &mut Vec<StagedFile>,
) -> ApiResult<IntakeOutcome> {
    let mut format_value: Option<String> = None;
    let mut saw_file_part = false;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FORMAT_FIELD) => {
                format_value = Some(field.text().await?);
            }
            Some(FILES_FIELD) => {
                saw_file_part = true;
                if let Some(file) = stage_field(state, field).await? {
                    staged.push(file);
                }
            }
            _ => {
                // Unknown fields are drained and ignored.
            }
        }
    }

    if !saw_file_part {
        return Ok(IntakeOutcome::NoFiles);
    }

    let format = parse_format(state, format_value.as_deref())?;

    let file_name = ArchiveBuilder::fresh_output_name(format);
    state.builder.build(staged.as_slice(), format, &file_name).await?;

    Ok(IntakeOutcome::Archived {
        file_name,
        archived: staged.len() as u64,
    })
}

/// Validate one uploaded file part and stream it into the staging area.
///
/// Returns `None` when the part is skipped (intake filter rejection or a
/// name that sanitizes to nothing); skipped parts never abort the batch,
/// they just shrink it.
async fn stage_field(state: &AppState, mut field: Field<'_>) -> ApiResult<Option<StagedFile>> {
    let Some(original) = field.file_name().map(str::to_string) else {
        return Ok(None);
    };
    if original.is_empty() {
        return Ok(None);
    }

    if !accepts_upload(&original, &state.config.archive.allowed_extensions) {
        tracing::warn!(file = %original, "skipping upload: extension not accepted");
        return Ok(None);
    }

    let Some(name) = sanitize_file_name(&original) else {
        tracing::warn!(file = %original, "skipping upload: no usable name after sanitization");
        return Ok(None);
    };

    let mut writer = state.staging.create(&name).await?;
    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                if let Err(e) = writer.write_chunk(chunk).await {
                    writer.discard().await;
                    return Err(e.into());
                }
            }
            Ok(None) => break,
            Err(e) => {
                writer.discard().await;
                return Err(e.into());
            }
        }
    }

    let staged = writer.finish().await?;
    tracing::debug!(file = %staged.name, size = staged.size, "upload staged");
    Ok(Some(staged))
}

/// Validate the requested archive format against the configured allow-list.
fn parse_format(state: &AppState, value: Option<&str>) -> ApiResult<ArchiveFormat> {
    let value = value.ok_or(ApiError::InvalidFormat)?;

    let allowed = &state.config.archive.allowed_extensions;
    if !allowed.iter().any(|ext| ext.eq_ignore_ascii_case(value)) {
        return Err(ApiError::InvalidFormat);
    }

    value.parse().map_err(|_| ApiError::InvalidFormat)
}
