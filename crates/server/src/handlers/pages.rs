//! Upload form and download pages.
//!
//! Page rendering is deliberately minimal: the pages only exist so the
//! upload and download flows can be driven from a browser.

use crate::error::ApiResult;
use crate::handlers::common::validate_archive_name;
use axum::extract::Path;
use axum::response::Html;

const INDEX_PAGE: &str = r#"<!doctype html>
<html>
  <head><title>baler</title></head>
  <body>
    <h1>Bundle files into an archive</h1>
    <form action="/" method="post" enctype="multipart/form-data">
      <p><input type="file" name="files" multiple></p>
      <p>
        <select name="format">
          <option value="zip">zip</option>
          <option value="tar">tar</option>
        </select>
      </p>
      <p><button type="submit">Create archive</button></p>
    </form>
  </body>
</html>
"#;

/// Upload form page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// Page offering a produced archive for download.
///
/// The name is validated before it is interpolated into markup, so only
/// names the service itself could have produced are ever rendered.
pub async fn download_page(Path(filename): Path<String>) -> ApiResult<Html<String>> {
    let filename = validate_archive_name(&filename)?;

    Ok(Html(format!(
        r#"<!doctype html>
<html>
  <head><title>baler</title></head>
  <body>
    <h1>Your archive is ready</h1>
    <p><a href="/download/{filename}" download>Download {filename}</a></p>
    <p><a href="/">Bundle more files</a></p>
  </body>
</html>
"#
    )))
}
