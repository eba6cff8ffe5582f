//! Server test utilities.

use baler_archive::{ArchiveBuilder, Staging};
use baler_core::config::AppConfig;
use baler_server::quota::{MemoryQuotaStore, QuotaStore};
use baler_server::{AppState, create_router};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Client address injected for all test requests.
pub const TEST_CLIENT_ADDR: &str = "127.0.0.1";

/// Multipart boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "X-BALER-TEST-BOUNDARY";

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with temporary staging and output dirs.
    pub async fn new() -> Self {
        Self::with_config_mut(|_| {}).await
    }

    /// Create a test server after applying `adjust` to the default config.
    pub async fn with_config_mut(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let mut config = AppConfig::for_testing();
        config.paths.upload_dir = temp_dir.path().join("uploads");
        config.paths.download_dir = temp_dir.path().join("downloads");
        adjust(&mut config);

        let staging = Arc::new(
            Staging::new(&config.paths.upload_dir)
                .await
                .expect("Failed to create staging area"),
        );
        let builder = Arc::new(
            ArchiveBuilder::new(&config.paths.download_dir)
                .await
                .expect("Failed to create archive builder"),
        );
        let quota: Arc<dyn QuotaStore> = Arc::new(MemoryQuotaStore::new());

        let state = AppState::new(config, staging, builder, quota);

        // MockConnectInfo stands in for the real connection address that
        // into_make_service_with_connect_info provides in production.
        let addr: SocketAddr = format!("{TEST_CLIENT_ADDR}:4000").parse().unwrap();
        let router = create_router(state.clone())
            .layer(axum::extract::connect_info::MockConnectInfo(addr));

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// The staging directory in use.
    pub fn upload_dir(&self) -> &Path {
        self.state.staging.root()
    }

    /// The output directory in use.
    pub fn download_dir(&self) -> &Path {
        self.state.builder.output_dir()
    }

    /// Files currently present in a directory (non-recursive).
    pub fn dir_entries(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Build a multipart/form-data body with the given file parts and optional
/// format field.
#[allow(dead_code)]
pub fn multipart_body(files: &[(&str, &[u8])], format: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, content) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }

    if let Some(format) = format {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"format\"\r\n\r\n\
                 {format}\r\n"
            )
            .as_bytes(),
        );
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
