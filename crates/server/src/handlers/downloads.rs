//! Archive download streaming.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::validate_archive_name;
use crate::state::AppState;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use baler_core::ArchiveFormat;
use tokio_util::io::ReaderStream;

/// Stream a produced archive from the output directory as an attachment.
pub async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let filename = validate_archive_name(&filename)?.to_string();
    let path = state.builder.output_dir().join(&filename);

    let file = tokio::fs::File::open(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ApiError::NotFound(format!("no such archive: {filename}"))
        } else {
            ApiError::Internal(format!("failed to open archive: {e}"))
        }
    })?;

    let size = file
        .metadata()
        .await
        .map_err(|e| ApiError::Internal(format!("failed to stat archive: {e}")))?
        .len();

    let content_type = filename
        .rsplit_once('.')
        .and_then(|(_, ext)| ext.parse::<ArchiveFormat>().ok())
        .map(ArchiveFormat::content_type)
        .unwrap_or("application/octet-stream");

    let body = Body::from_stream(ReaderStream::new(file));

    Ok((
        [
            (CONTENT_TYPE, content_type.to_string()),
            (CONTENT_LENGTH, size.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}
