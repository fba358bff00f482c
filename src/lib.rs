// src/lib.rs
// =============================================================================
// breadth-crawler: a breadth-first web crawler.
//
// Given seed addresses, it fetches each page, extracts outbound links, and
// visits newly discovered pages up to a maximum depth, collecting the bodies.
//
// Modules:
// - crawl: the traversal engine (frontier, visited set, run loop, events)
// - fetch: the Fetcher trait and the reqwest-backed HttpFetcher
// - extract: the LinkExtractor trait and the scraper-backed HTML extractor
// - config: crawl settings (defaults, JSON file, validation)
// =============================================================================

pub mod config;
pub mod crawl;
pub mod extract;
pub mod fetch;

pub use config::CrawlConfig;
pub use crawl::{
    AddressDepth, ChannelSink, ConstructionError, CrawlEvent, Crawler, EventSink,
    ExtractionError, FetchError, RunSummary, StepError, TracingSink,
};
pub use extract::{HtmlLinkExtractor, LinkExtractor};
pub use fetch::{Fetcher, HttpFetcher};
