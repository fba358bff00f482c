// src/crawl/error.rs
// =============================================================================
// Error types for the traversal engine.
//
// Two kinds of failure exist:
// - Per-address failures (FetchError, ExtractionError). These are contained
//   inside a crawl step, reported as events, and never stop the run loop.
// - Construction failures (ConstructionError). These mean the engine cannot
//   be built at all, so they go straight back to the caller.
// =============================================================================

use thiserror::Error;

/// The fetch capability could not retrieve a body for an address.
///
/// The engine treats every variant the same way; the split only exists so
/// logs and events say something useful.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP {code}")]
    Status { code: u16 },

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("{0}")]
    Other(String),
}

/// The link-extraction capability could not process a fetched body.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("malformed document: {0}")]
    Malformed(String),
}

/// Invalid configuration detected while building a crawler.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("max depth must be non-negative, got {0}")]
    NegativeMaxDepth(i64),

    #[error("max depth {0} is too large")]
    MaxDepthTooLarge(i64),
}

/// Anything that can abort a single crawl step.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("link extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("'{0}' was already crawled")]
    AlreadyVisited(String),
}
