//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum request body size in bytes, enforced at the HTTP boundary
    /// before any multipart parsing happens.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_max_body_size() -> usize {
    crate::DEFAULT_MAX_BODY_SIZE
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_size: default_max_body_size(),
        }
    }
}

/// Filesystem layout configuration.
///
/// Both directories are created at startup if absent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Staging directory for validated uploads.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Output directory for produced archives.
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./data/uploads")
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("./data/downloads")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            download_dir: default_download_dir(),
        }
    }
}

/// Per-client quota configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Maximum number of files archived per client.
    #[serde(default = "default_max_files_per_client")]
    pub max_files_per_client: u64,
    /// Trust X-Forwarded-For / X-Real-IP headers when identifying clients.
    /// Only enable behind a reverse proxy that strips client-supplied
    /// values; otherwise clients can pick their own quota bucket.
    #[serde(default)]
    pub trust_forwarded_headers: bool,
}

fn default_max_files_per_client() -> u64 {
    crate::DEFAULT_MAX_FILES_PER_CLIENT
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            max_files_per_client: default_max_files_per_client(),
            trust_forwarded_headers: false,
        }
    }
}

/// Archive output configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Archive extensions the service will produce. Requests naming any
    /// other format are rejected with a client error.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["zip".to_string(), "tar".to_string()]
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Filesystem layout.
    #[serde(default)]
    pub paths: PathsConfig,
    /// Per-client quota.
    #[serde(default)]
    pub quota: QuotaConfig,
    /// Archive output.
    #[serde(default)]
    pub archive: ArchiveConfig,
}

impl AppConfig {
    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Tests are expected to point `paths` at a
    /// temporary directory.
    pub fn for_testing() -> Self {
        Self::default()
    }

    /// Validate configuration for dangerous settings.
    ///
    /// Returns warnings for configs that are risky but allowed, and errors
    /// for configs that are unsafe and should be rejected.
    pub fn validate(&self) -> Result<Vec<String>, String> {
        let mut warnings = Vec::new();

        if self.server.max_body_size == 0 {
            return Err(
                "server.max_body_size cannot be 0. Every upload would be rejected \
                 at the HTTP boundary before reaching the archive pipeline."
                    .to_string(),
            );
        }

        if self.archive.allowed_extensions.is_empty() {
            return Err(
                "archive.allowed_extensions cannot be empty. \
                 Every request would be rejected with an invalid-format error."
                    .to_string(),
            );
        }

        for ext in &self.archive.allowed_extensions {
            if ext.parse::<crate::ArchiveFormat>().is_err() {
                warnings.push(format!(
                    "archive.allowed_extensions entry '{ext}' has no codec; \
                     requests naming it will fail format validation anyway"
                ));
            }
        }

        if self.quota.max_files_per_client == 0 {
            warnings.push(
                "quota.max_files_per_client is 0; each client will be blocked \
                 after its first successful batch"
                    .to_string(),
            );
        }

        if self.quota.trust_forwarded_headers {
            warnings.push(
                "quota.trust_forwarded_headers is enabled. Clients can spoof their \
                 identity and escape quota accounting unless a trusted reverse proxy \
                 strips these headers."
                    .to_string(),
            );
        }

        Ok(warnings)
    }
}
