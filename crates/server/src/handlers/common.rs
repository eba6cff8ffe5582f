//! Shared handler helpers.

use crate::error::{ApiError, ApiResult};

/// Validate a client-supplied file name used to address archives in the
/// output directory.
///
/// Only names the service itself could have produced pass: a restricted
/// character set with no separators, traversal sequences, or leading dots.
/// Rejections surface as 404 so probing for files and probing for names
/// are indistinguishable.
pub fn validate_archive_name(name: &str) -> ApiResult<&str> {
    let safe = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));

    if !safe {
        return Err(ApiError::NotFound(format!("no such archive: {name}")));
    }
    Ok(name)
}
