//! Startup filesystem bootstrap.

use anyhow::{Context, Result};
use baler_core::config::AppConfig;
use tokio::fs;

/// Ensure the staging and output directories exist.
///
/// Missing directories are a startup failure, never a request-time one.
pub async fn ensure_directories(config: &AppConfig) -> Result<()> {
    fs::create_dir_all(&config.paths.upload_dir)
        .await
        .with_context(|| {
            format!(
                "failed to create upload directory {}",
                config.paths.upload_dir.display()
            )
        })?;

    fs::create_dir_all(&config.paths.download_dir)
        .await
        .with_context(|| {
            format!(
                "failed to create download directory {}",
                config.paths.download_dir.display()
            )
        })?;

    tracing::info!(
        upload_dir = %config.paths.upload_dir.display(),
        download_dir = %config.paths.download_dir.display(),
        "Directories ready"
    );

    Ok(())
}
