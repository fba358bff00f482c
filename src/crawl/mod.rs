// src/crawl/mod.rs
// =============================================================================
// This module is the traversal engine.
//
// Features:
// - Breadth-first crawling from one or more seed addresses
// - Depth bound checked when a record is popped, not when it is queued
// - Every address is crawled at most once, regardless of cycles
// - Per-address failures are reported and contained
//
// Submodules:
// - frontier: FIFO queue + visited set bookkeeping
// - engine: the Crawler itself (construction, crawl step, run loop)
// - events: per-address outcome events and the sinks that receive them
// - error: typed errors
// =============================================================================

mod engine;
mod error;
mod events;
mod frontier;

pub use engine::{
    resolve_link, validate_max_depth, Crawler, RunSummary, StepOutcome, DEFAULT_MAX_DEPTH,
};
pub use error::{ConstructionError, ExtractionError, FetchError, StepError};
pub use events::{ChannelSink, CrawlEvent, EventSink, TracingSink};
pub use frontier::{AddressDepth, Frontier, VisitedSet};
