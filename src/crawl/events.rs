// src/crawl/events.rs
// =============================================================================
// Per-address outcome events.
//
// The run loop reports what happened to every popped record through an
// EventSink that the caller injects. The engine itself never configures
// logging; the default sink just forwards events to `tracing`.
//
// Sinks provided:
// - TracingSink: structured log lines (the default)
// - any FnMut(CrawlEvent) closure
// - ChannelSink, wrapping a tokio mpsc sender for consumers on another task
// =============================================================================

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

/// What happened to one record popped from the frontier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CrawlEvent {
    /// Body fetched and appended to the corpus; links expanded.
    Fetched {
        address: String,
        depth: u32,
        bytes: usize,
        links_admitted: usize,
    },
    /// Fetch or link extraction failed. The address is still marked visited.
    Failed {
        address: String,
        depth: u32,
        error: String,
    },
    /// Popped beyond the depth bound, so never fetched.
    Skipped {
        address: String,
        depth: u32,
        max_depth: u32,
    },
}

impl CrawlEvent {
    pub fn address(&self) -> &str {
        match self {
            CrawlEvent::Fetched { address, .. }
            | CrawlEvent::Failed { address, .. }
            | CrawlEvent::Skipped { address, .. } => address,
        }
    }
}

/// Receives crawl events from the run loop.
pub trait EventSink: Send {
    fn emit(&mut self, event: CrawlEvent);
}

/// Logs every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: CrawlEvent) {
        match event {
            CrawlEvent::Fetched {
                address,
                depth,
                bytes,
                links_admitted,
            } => {
                tracing::info!(%address, depth, bytes, links_admitted, "Crawled page");
            }
            CrawlEvent::Failed {
                address,
                depth,
                error,
            } => {
                tracing::warn!(%address, depth, %error, "Failed to crawl page");
            }
            CrawlEvent::Skipped {
                address,
                depth,
                max_depth,
            } => {
                tracing::debug!(%address, depth, max_depth, "Skipping page beyond max depth");
            }
        }
    }
}

impl<F> EventSink for F
where
    F: FnMut(CrawlEvent) + Send,
{
    fn emit(&mut self, event: CrawlEvent) {
        self(event)
    }
}

/// Forwards events over an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink(pub UnboundedSender<CrawlEvent>);

impl EventSink for ChannelSink {
    fn emit(&mut self, event: CrawlEvent) {
        // A closed receiver just means nobody is listening any more.
        let _ = self.0.send(event);
    }
}
