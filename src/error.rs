// src/error.rs
//! Domain error taxonomy. Fetch and scoring failures are recovered locally
//! and degrade to empty data; only configuration problems and whole-pass
//! failures reach the HTTP surface.

use thiserror::Error;

/// A source's page could not be retrieved. Non-fatal to the overall run:
/// the source contributes an empty collection.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Timed out waiting for page content")]
    Timeout,

    #[error("Request blocked by anti-bot protection (status {0})")]
    Blocked(u16),

    #[error("Network error: {0}")]
    Network(String),
}

/// Errors surfaced by the query service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Failed to scrape job listings: {0}")]
    Upstream(String),
}
