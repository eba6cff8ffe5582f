//! Application state shared across handlers.

use crate::quota::QuotaStore;
use baler_archive::{ArchiveBuilder, Staging};
use baler_core::config::AppConfig;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Staging area for validated uploads.
    pub staging: Arc<Staging>,
    /// Archive builder for the output directory.
    pub builder: Arc<ArchiveBuilder>,
    /// Per-client quota store.
    pub quota: Arc<dyn QuotaStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// This performs configuration validation and logs warnings for
    /// potentially dangerous settings.
    ///
    /// # Panics
    ///
    /// Panics if configuration validation fails with an error.
    pub fn new(
        config: AppConfig,
        staging: Arc<Staging>,
        builder: Arc<ArchiveBuilder>,
        quota: Arc<dyn QuotaStore>,
    ) -> Self {
        match config.validate() {
            Ok(warnings) => {
                for warning in warnings {
                    tracing::warn!("Configuration warning: {}", warning);
                }
            }
            Err(error) => {
                panic!("Invalid configuration: {}", error);
            }
        }

        Self {
            config: Arc::new(config),
            staging,
            builder,
            quota,
        }
    }
}
