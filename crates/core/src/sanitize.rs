//! Upload filename sanitization and filtering.
//!
//! Uploaded names are attacker-controlled and are reused both as staging
//! filesystem paths and as archive entry names, so anything that could
//! address a location outside the staging directory (or escape an
//! extraction directory later) must be stripped before first use.

/// Characters allowed verbatim in sanitized names; everything else maps to `_`.
fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')
}

/// Derive a name that is safe to use both as a staging filesystem path and
/// as an archive entry name.
///
/// Directory components (Unix or Windows separators) are stripped, unsafe
/// characters collapse to underscores, and runs of dots collapse to a single
/// dot so the result can never contain a traversal sequence. Returns `None`
/// when the name sanitizes to nothing, or to a hidden file.
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);

    let mut cleaned = String::with_capacity(base.len());
    let mut last_dot = false;
    for c in base.chars() {
        if c == '.' {
            if !last_dot {
                cleaned.push('.');
            }
            last_dot = true;
        } else {
            cleaned.push(if is_safe_char(c) { c } else { '_' });
            last_dot = false;
        }
    }

    let cleaned = cleaned
        .trim_end_matches(['.', '_'])
        .trim_start_matches('_');

    if cleaned.is_empty() || cleaned.starts_with('.') {
        return None;
    }

    Some(cleaned.to_string())
}

/// Upload intake filter.
///
/// Returns `true` when `name` carries an extension and that extension is
/// not itself one of the archive extensions the service produces; names
/// without any extension are rejected. Comparison is ASCII
/// case-insensitive.
pub fn accepts_upload(name: &str, archive_extensions: &[String]) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => !archive_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
        None => false,
    }
}
