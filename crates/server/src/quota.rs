//! Per-client upload quota tracking.
//!
//! Quota state is keyed by client identifier (the connection's source
//! address) and counts files successfully archived on that client's behalf.
//! Counters are process-lifetime: they are never decremented or expired.
//! A request is denied only when the stored count already exceeds the
//! configured maximum, so a client may finish one batch past the nominal
//! limit before being blocked.
//!
//! # Security Note
//!
//! X-Forwarded-For and X-Real-IP headers are NOT trusted by default, to
//! prevent clients from choosing their own quota bucket. Set
//! `quota.trust_forwarded_headers` only when a trusted reverse proxy strips
//! client-supplied values.

use async_trait::async_trait;
use axum::http::HeaderMap;
use dashmap::DashMap;
use std::net::SocketAddr;

/// Store of per-client archived-file counts.
///
/// Kept behind a trait so the in-memory map can be swapped for a
/// persistent or distributed store without touching the archive pipeline.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    /// Number of files recorded for this client (0 for unseen clients).
    async fn recorded(&self, client: &str) -> u64;

    /// Add `files` to the client's count, returning the new total.
    ///
    /// Updates for the same client must not lose increments under
    /// concurrent requests.
    async fn record(&self, client: &str, files: u64) -> u64;
}

/// In-memory quota store backed by a concurrent map.
#[derive(Default)]
pub struct MemoryQuotaStore {
    counts: DashMap<String, u64>,
}

impl MemoryQuotaStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of clients currently tracked.
    pub fn client_count(&self) -> usize {
        self.counts.len()
    }
}

#[async_trait]
impl QuotaStore for MemoryQuotaStore {
    async fn recorded(&self, client: &str) -> u64 {
        self.counts.get(client).map(|count| *count).unwrap_or(0)
    }

    async fn record(&self, client: &str, files: u64) -> u64 {
        // The entry guard holds the shard lock, making read-modify-write
        // atomic per client.
        let mut entry = self.counts.entry(client.to_string()).or_insert(0);
        *entry += files;
        *entry
    }
}

/// Extract the client identifier used for quota accounting.
///
/// The direct connection address is authoritative. Forwarded headers are
/// consulted only when `trust_forwarded_headers` is set: first the leading
/// entry of X-Forwarded-For, then X-Real-IP.
pub fn client_id(headers: &HeaderMap, addr: SocketAddr, trust_forwarded_headers: bool) -> String {
    if trust_forwarded_headers {
        if let Some(forwarded) = headers.get("x-forwarded-for")
            && let Ok(value) = forwarded.to_str()
            && let Some(ip) = value.split(',').next()
        {
            let ip = ip.trim();
            if !ip.is_empty() {
                return ip.to_string();
            }
        }

        if let Some(real_ip) = headers.get("x-real-ip")
            && let Ok(value) = real_ip.to_str()
        {
            let value = value.trim();
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }

    addr.ip().to_string()
}
