// src/extract/mod.rs
// =============================================================================
// The link-extraction capability: document body in, raw link strings out.
//
// Extractors do NOT resolve relative links. The engine decides which links
// get resolved against the page address (see crawl::engine::resolve_link).
// =============================================================================

mod html;

pub use html::HtmlLinkExtractor;

use crate::crawl::ExtractionError;

/// Finds raw link strings in a fetched document.
pub trait LinkExtractor: Send + Sync {
    /// Returns every link target in `body`, in document order, unresolved.
    /// `base` is the address the body was fetched from.
    fn extract(&self, body: &str, base: &str) -> Result<Vec<String>, ExtractionError>;
}

