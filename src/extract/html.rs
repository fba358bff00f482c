// src/extract/html.rs
// =============================================================================
// Pulls link targets out of HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (built on html5ever, so broken markup is fine)
// - Supports CSS selectors for finding elements
//
// Every <a href="..."> value is returned exactly as written. Resolution of
// root-relative links happens later, in the engine.
// =============================================================================

use scraper::{Html, Selector};

use super::LinkExtractor;
use crate::crawl::ExtractionError;

/// Extracts the `href` of every `<a>` element.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlLinkExtractor;

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, body: &str, _base: &str) -> Result<Vec<String>, ExtractionError> {
        let document = Html::parse_document(body);

        // Constant selector, known to be valid
        let selector = Selector::parse("a[href]").expect("a[href] is a valid selector");

        let links = document
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect();

        Ok(links)
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why return raw strings instead of url::Url?
//    - The engine treats addresses as opaque strings
//    - Only root-relative links ("/docs") are resolved, everything else is
//      kept verbatim, so parsing here would throw information away
//
// 2. What about href="" ?
//    - It is returned like any other value and queued as an address of its
//      own; if it can't be fetched, that step fails and the crawl moves on
// -----------------------------------------------------------------------------
