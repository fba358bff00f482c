// src/fetch/mod.rs
// =============================================================================
// The fetch capability: address in, document body out.
//
// The traversal engine only knows about the Fetcher trait, so tests can plug
// in an in-memory page graph and embedders can plug in whatever transport
// they like. HttpFetcher is the reqwest-backed default used by the CLI.
// =============================================================================

mod http;

pub use http::HttpFetcher;

use async_trait::async_trait;

use crate::crawl::FetchError;

/// Retrieves the raw body for an address.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, address: &str) -> Result<String, FetchError>;
}

