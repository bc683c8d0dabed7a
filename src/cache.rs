// src/cache.rs
//! On-disk snapshot cache. One JSON document holds the full multi-source
//! snapshot from a single scrape pass; freshness is the written_at field
//! checked against the TTL. Malformed content is treated as a miss.

use crate::types::CacheEntry;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ResultCache {
    path: PathBuf,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(path: PathBuf, ttl: Duration) -> Self {
        Self { path, ttl }
    }

    /// Returns the cached snapshot if it exists, parses, and is younger
    /// than the TTL. An entry aged exactly at the TTL counts as stale.
    pub async fn read(&self) -> Option<CacheEntry> {
        let content = tokio::fs::read_to_string(&self.path).await.ok()?;

        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(
                    "Malformed cache file {}, treating as miss: {}",
                    self.path.display(),
                    e
                );
                return None;
            }
        };

        let ttl = chrono::Duration::from_std(self.ttl).ok()?;
        let age = chrono::Utc::now().signed_duration_since(entry.written_at);
        if age >= ttl {
            debug!("Cache entry expired ({}s old)", age.num_seconds());
            return None;
        }

        Some(entry)
    }

    /// Persist a snapshot. Write-to-temp-then-rename keeps the overwrite
    /// atomic for readers; last writer wins.
    pub async fn write(&self, entry: &CacheEntry) -> Result<()> {
        let json = serde_json::to_string_pretty(entry).context("Failed to serialize cache entry")?;

        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, &json)
            .await
            .with_context(|| format!("Failed to write cache file: {}", tmp_path.display()))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .with_context(|| format!("Failed to replace cache file: {}", self.path.display()))?;

        debug!("Cache written to {}", self.path.display());
        Ok(())
    }
}
