//! HTTP API server for the baler archive service.
//!
//! This crate provides the HTTP surface:
//! - Multipart upload intake and archive assembly
//! - Per-client upload quota enforcement
//! - Archive download streaming
//! - Upload form and download pages

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod quota;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use quota::{MemoryQuotaStore, QuotaStore};
pub use routes::create_router;
pub use state::AppState;
