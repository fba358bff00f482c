// src/crawl/engine.rs
// =============================================================================
// The traversal engine: a breadth-first crawl over injected fetch and
// link-extraction capabilities.
//
// How it works:
// 1. Seeds go into the frontier at depth 0
// 2. Pop the head record
// 3. If its depth is within max_depth, run a crawl step on it:
//    fetch -> append body to corpus -> extract links -> offer each at depth+1
//    Otherwise skip it (no fetch)
// 4. Whatever happened, mark the address visited and report an event
// 5. Repeat until the frontier is empty
//
// A failing step is reported and the loop moves on. One bad address never
// stops the crawl.
// =============================================================================

use serde::Serialize;
use url::Url;

use super::error::{ConstructionError, StepError};
use super::events::{CrawlEvent, EventSink, TracingSink};
use super::frontier::{AddressDepth, Frontier, VisitedSet};
use crate::extract::LinkExtractor;
use crate::fetch::Fetcher;

/// Depth used when nothing else is configured.
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Converts a signed depth bound into the engine's unsigned form.
pub fn validate_max_depth(max_depth: i64) -> Result<u32, ConstructionError> {
    if max_depth < 0 {
        return Err(ConstructionError::NegativeMaxDepth(max_depth));
    }
    u32::try_from(max_depth).map_err(|_| ConstructionError::MaxDepthTooLarge(max_depth))
}

/// Result of one successful crawl step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Size of the fetched body in bytes.
    pub bytes: usize,
    /// Links found on the page.
    pub links_found: usize,
    /// Links that made it into the frontier.
    pub links_admitted: usize,
}

/// Counters for one call to [`Crawler::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub fetched: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Total size of the visited set when the run finished.
    pub visited: usize,
    /// Total number of bodies in the corpus when the run finished.
    pub documents: usize,
}

/// Breadth-first crawler.
///
/// Owns the frontier, the visited set and the corpus for exactly one
/// traversal. Nothing is shared between instances.
pub struct Crawler<F, E> {
    frontier: Frontier,
    visited: VisitedSet,
    corpus: Vec<String>,
    max_depth: u32,
    fetcher: F,
    extractor: E,
    sink: Box<dyn EventSink>,
}

impl<F: Fetcher, E: LinkExtractor> Crawler<F, E> {
    /// Builds a crawler with its seeds queued at depth 0.
    ///
    /// No fetching happens here. Duplicate seeds collapse into a single
    /// frontier entry.
    pub fn new<I, S>(
        seeds: I,
        max_depth: i64,
        fetcher: F,
        extractor: E,
    ) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let max_depth = validate_max_depth(max_depth)?;

        let mut crawler = Self {
            frontier: Frontier::new(),
            visited: VisitedSet::new(),
            corpus: Vec::new(),
            max_depth,
            fetcher,
            extractor,
            sink: Box::new(TracingSink),
        };

        for seed in seeds {
            crawler.offer(AddressDepth::seed(seed));
        }

        Ok(crawler)
    }

    /// Replaces the default tracing sink.
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Queues `record` unless its address is already visited, queued or
    /// being crawled. Returns whether it was admitted.
    pub fn offer(&mut self, record: AddressDepth) -> bool {
        self.frontier.offer(record, &self.visited)
    }

    /// Fetches one record, stores its body and offers its links.
    ///
    /// The address is marked visited once the step concludes, on success or
    /// failure. An address that is already visited is not fetched again.
    pub async fn step(&mut self, record: &AddressDepth) -> Result<StepOutcome, StepError> {
        if self.visited.contains(&record.address) {
            return Err(StepError::AlreadyVisited(record.address.clone()));
        }

        self.frontier.reserve(&record.address);
        let result = self.expand(record).await;
        self.finish(&record.address);
        result
    }

    async fn expand(&mut self, record: &AddressDepth) -> Result<StepOutcome, StepError> {
        let body = self.fetcher.fetch(&record.address).await?;
        let bytes = body.len();

        // The body is kept even if link extraction fails below
        let links = self.extractor.extract(&body, &record.address);
        self.corpus.push(body);
        let links = links?;

        let links_found = links.len();
        let mut links_admitted = 0;
        for raw in links {
            let address = resolve_link(&record.address, &raw);
            if self.offer(record.child(address)) {
                links_admitted += 1;
            }
        }

        Ok(StepOutcome {
            bytes,
            links_found,
            links_admitted,
        })
    }

    fn finish(&mut self, address: &str) {
        self.frontier.release(address);
        self.visited.mark(address);
    }

    /// Drains the frontier. Always returns; per-address failures are
    /// reported through the event sink and counted in the summary.
    pub async fn run(&mut self) -> RunSummary {
        tracing::info!(
            queued = self.frontier.len(),
            max_depth = self.max_depth,
            "Starting crawl"
        );

        let mut summary = RunSummary::default();

        while let Some(record) = self.frontier.pop() {
            // Already handled by a direct call to step()
            if self.visited.contains(&record.address) {
                continue;
            }

            let event = if record.depth <= self.max_depth {
                match self.step(&record).await {
                    Ok(outcome) => {
                        summary.fetched += 1;
                        CrawlEvent::Fetched {
                            address: record.address.clone(),
                            depth: record.depth,
                            bytes: outcome.bytes,
                            links_admitted: outcome.links_admitted,
                        }
                    }
                    Err(error) => {
                        summary.failed += 1;
                        CrawlEvent::Failed {
                            address: record.address.clone(),
                            depth: record.depth,
                            error: error.to_string(),
                        }
                    }
                }
            } else {
                self.finish(&record.address);
                summary.skipped += 1;
                CrawlEvent::Skipped {
                    address: record.address.clone(),
                    depth: record.depth,
                    max_depth: self.max_depth,
                }
            };

            self.sink.emit(event);
        }

        summary.visited = self.visited.len();
        summary.documents = self.corpus.len();

        tracing::info!(
            fetched = summary.fetched,
            failed = summary.failed,
            skipped = summary.skipped,
            visited = summary.visited,
            "Crawl completed"
        );

        summary
    }

    /// Bodies fetched so far, in fetch order.
    pub fn corpus(&self) -> &[String] {
        &self.corpus
    }

    pub fn into_corpus(self) -> Vec<String> {
        self.corpus
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

/// Turns a raw link into the address that gets queued.
///
/// Root-relative links ("/docs", "//cdn.example.com/x") are joined onto
/// `base`. Everything else is used as written. If `base` is not an absolute
/// URL the raw link is returned unchanged.
pub fn resolve_link(base: &str, raw: &str) -> String {
    if !raw.starts_with('/') {
        return raw.to_string();
    }

    match Url::parse(base).and_then(|base| base.join(raw)) {
        Ok(url) => url.to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::{ChannelSink, ExtractionError, FetchError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    // In-memory link graph. A page's body is its address on the first line
    // followed by one link per line.
    #[derive(Clone, Default)]
    struct MockWeb {
        pages: HashMap<String, Vec<String>>,
        fetches: Arc<Mutex<Vec<String>>>,
    }

    impl MockWeb {
        fn page(mut self, address: &str, links: &[&str]) -> Self {
            self.pages.insert(
                address.to_string(),
                links.iter().map(|l| l.to_string()).collect(),
            );
            self
        }

        fn fetches(&self) -> Vec<String> {
            self.fetches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for MockWeb {
        async fn fetch(&self, address: &str) -> Result<String, FetchError> {
            self.fetches.lock().unwrap().push(address.to_string());
            match self.pages.get(address) {
                Some(links) => Ok(format!("{}\n{}", address, links.join("\n"))),
                None => Err(FetchError::Status { code: 404 }),
            }
        }
    }

    struct LineExtractor;

    impl LinkExtractor for LineExtractor {
        fn extract(&self, body: &str, _base: &str) -> Result<Vec<String>, ExtractionError> {
            if body.contains("!malformed") {
                return Err(ExtractionError::Malformed("unreadable".to_string()));
            }
            Ok(body.lines().skip(1).map(str::to_string).collect())
        }
    }

    fn crawler(seeds: &[&str], max_depth: i64, web: &MockWeb) -> Crawler<MockWeb, LineExtractor> {
        Crawler::new(seeds.iter().copied(), max_depth, web.clone(), LineExtractor).unwrap()
    }

    fn first_lines(corpus: &[String]) -> Vec<&str> {
        corpus.iter().filter_map(|body| body.lines().next()).collect()
    }

    fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<CrawlEvent>) -> Vec<CrawlEvent> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[test]
    fn test_construction_does_no_fetching() {
        let web = MockWeb::default().page("A", &[]);
        let crawler = crawler(&["A", "B"], 2, &web);
        assert_eq!(crawler.frontier().len(), 2);
        assert!(crawler.visited().is_empty());
        assert!(crawler.corpus().is_empty());
        assert!(web.fetches().is_empty());
    }

    #[test]
    fn test_negative_max_depth_is_construction_error() {
        let result = Crawler::new(["A"], -1, MockWeb::default(), LineExtractor);
        assert!(matches!(result, Err(ConstructionError::NegativeMaxDepth(-1))));
    }

    #[tokio::test]
    async fn test_blank_seed_fails_alone() {
        let web = MockWeb::default().page("https://ok.example", &[]);
        let mut crawler = crawler(&["https://ok.example", ""], 2, &web);

        let summary = crawler.run().await;

        assert_eq!(web.fetches(), vec!["https://ok.example", ""]);
        assert_eq!(first_lines(crawler.corpus()), vec!["https://ok.example"]);
        assert!(crawler.visited().contains(""));
        assert_eq!(summary.fetched, 1);
        assert_eq!(summary.failed, 1);
    }

    #[tokio::test]
    async fn test_no_seeds_finishes_immediately() {
        let web = MockWeb::default();
        let mut crawler = crawler(&[], 2, &web);

        let summary = crawler.run().await;

        assert!(crawler.corpus().is_empty());
        assert!(crawler.visited().is_empty());
        assert_eq!(summary, RunSummary::default());
    }

    #[tokio::test]
    async fn test_back_link_and_failing_page() {
        // A -> B, C ; B -> A ; C fails
        let web = MockWeb::default().page("A", &["B", "C"]).page("B", &["A"]);
        let mut crawler = crawler(&["A"], 1, &web);

        let summary = crawler.run().await;

        assert_eq!(first_lines(crawler.corpus()), vec!["A", "B"]);
        assert_eq!(web.fetches(), vec!["A", "B", "C"]);
        let mut visited: Vec<_> = crawler.visited().iter().collect();
        visited.sort();
        assert_eq!(visited, vec!["A", "B", "C"]);
        assert_eq!(summary.fetched, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.visited, 3);
        assert_eq!(summary.documents, 2);
    }

    #[tokio::test]
    async fn test_depth_bound_skips_without_fetching() {
        // Chain A -> B -> C -> D with max depth 1
        let web = MockWeb::default()
            .page("A", &["B"])
            .page("B", &["C"])
            .page("C", &["D"]);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut crawler = crawler(&["A"], 1, &web).with_sink(ChannelSink(tx));

        let summary = crawler.run().await;

        assert_eq!(web.fetches(), vec!["A", "B"]);
        assert!(crawler.visited().contains("C"));
        assert!(!crawler.visited().contains("D"));
        assert_eq!(summary.skipped, 1);
        assert_eq!(
            drain(&mut rx).last(),
            Some(&CrawlEvent::Skipped {
                address: "C".to_string(),
                depth: 2,
                max_depth: 1,
            })
        );
    }

    #[tokio::test]
    async fn test_max_depth_zero_fetches_only_seeds() {
        let web = MockWeb::default().page("A", &["B"]).page("B", &[]);
        let mut crawler = crawler(&["A"], 0, &web);

        crawler.run().await;

        assert_eq!(web.fetches(), vec!["A"]);
        assert_eq!(crawler.visited().len(), 2);
    }

    #[tokio::test]
    async fn test_cycles_terminate_and_visit_once() {
        let web = MockWeb::default()
            .page("A", &["B", "C"])
            .page("B", &["C", "A"])
            .page("C", &["A", "B", "C"]);
        let mut crawler = crawler(&["A"], 100, &web);

        crawler.run().await;

        assert_eq!(web.fetches(), vec!["A", "B", "C"]);
        assert!(crawler.frontier().is_empty());
    }

    #[tokio::test]
    async fn test_self_link_not_refetched() {
        let web = MockWeb::default().page("A", &["A", "B"]).page("B", &["B"]);
        let mut crawler = crawler(&["A"], 5, &web);

        crawler.run().await;

        assert_eq!(web.fetches(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_shared_link_crawled_once() {
        // Two seeds both link to C
        let web = MockWeb::default()
            .page("A", &["C"])
            .page("B", &["C"])
            .page("C", &[]);
        let mut crawler = crawler(&["A", "B"], 2, &web);

        crawler.run().await;

        assert_eq!(web.fetches(), vec!["A", "B", "C"]);
        assert_eq!(crawler.corpus().len(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_seeds_fetched_once() {
        let web = MockWeb::default().page("A", &[]);
        let mut crawler = crawler(&["A", "A"], 2, &web);

        crawler.run().await;

        assert_eq!(web.fetches(), vec!["A"]);
    }

    #[tokio::test]
    async fn test_breadth_first_order_and_depths() {
        // A -> B, C ; B -> D ; C -> D, E
        let web = MockWeb::default()
            .page("A", &["B", "C"])
            .page("B", &["D"])
            .page("C", &["D", "E"])
            .page("D", &[])
            .page("E", &[]);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut crawler = crawler(&["A"], 2, &web).with_sink(ChannelSink(tx));

        crawler.run().await;

        let depths: Vec<_> = drain(&mut rx)
            .into_iter()
            .map(|event| match event {
                CrawlEvent::Fetched { address, depth, .. } => (address, depth),
                other => panic!("unexpected event {:?}", other),
            })
            .collect();
        assert_eq!(
            depths,
            vec![
                ("A".to_string(), 0),
                ("B".to_string(), 1),
                ("C".to_string(), 1),
                ("D".to_string(), 2),
                ("E".to_string(), 2),
            ]
        );
    }

    #[tokio::test]
    async fn test_extraction_failure_is_contained() {
        let web = MockWeb::default()
            .page("A", &["!malformed"])
            .page("B", &["C"])
            .page("C", &[]);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut crawler = crawler(&["A", "B"], 2, &web).with_sink(ChannelSink(tx));

        let summary = crawler.run().await;

        // The body was fetched, so it stays in the corpus
        assert_eq!(first_lines(crawler.corpus()), vec!["A", "B", "C"]);
        assert!(crawler.visited().contains("A"));
        assert_eq!(summary.failed, 1);
        assert!(matches!(
            drain(&mut rx).first(),
            Some(CrawlEvent::Failed { address, .. }) if address == "A"
        ));
    }

    #[tokio::test]
    async fn test_root_relative_links_resolved() {
        let web = MockWeb::default()
            .page(
                "https://example.com/docs/index.html",
                &["/about", "https://other.org/x", "guide.html"],
            )
            .page("https://example.com/about", &[]);
        let mut crawler = crawler(&["https://example.com/docs/index.html"], 1, &web);

        crawler.run().await;

        assert_eq!(
            web.fetches(),
            vec![
                "https://example.com/docs/index.html",
                "https://example.com/about",
                "https://other.org/x",
                "guide.html",
            ]
        );
    }

    #[tokio::test]
    async fn test_step_marks_visited() {
        let web = MockWeb::default().page("A", &["A", "B"]);
        let mut crawler = crawler(&[], 2, &web);

        let outcome = crawler.step(&AddressDepth::seed("A")).await.unwrap();

        // The self-link is rejected while A is being crawled
        assert_eq!(outcome.links_found, 2);
        assert_eq!(outcome.links_admitted, 1);
        assert!(crawler.visited().contains("A"));
        assert!(!crawler.frontier().contains("A"));
        assert!(crawler.frontier().contains("B"));
    }

    #[tokio::test]
    async fn test_step_then_run_fetches_seed_once() {
        let web = MockWeb::default().page("A", &[]);
        let mut crawler = crawler(&["A"], 2, &web);

        crawler.step(&AddressDepth::seed("A")).await.unwrap();
        let summary = crawler.run().await;

        assert_eq!(web.fetches(), vec!["A"]);
        assert_eq!(summary.fetched, 0);
        assert_eq!(summary.visited, 1);
        assert!(crawler.frontier().is_empty());
    }

    #[tokio::test]
    async fn test_step_on_visited_address_does_not_fetch() {
        let web = MockWeb::default().page("A", &[]);
        let mut crawler = crawler(&[], 2, &web);

        crawler.step(&AddressDepth::seed("A")).await.unwrap();
        let again = crawler.step(&AddressDepth::seed("A")).await;

        assert!(matches!(again, Err(StepError::AlreadyVisited(address)) if address == "A"));
        assert_eq!(web.fetches(), vec!["A"]);
    }

    #[tokio::test]
    async fn test_step_fetch_failure_still_marks_visited() {
        let web = MockWeb::default();
        let mut crawler = crawler(&[], 2, &web);

        let result = crawler.step(&AddressDepth::seed("missing")).await;

        assert!(matches!(result, Err(StepError::Fetch(FetchError::Status { code: 404 }))));
        assert!(crawler.corpus().is_empty());
        assert!(crawler.visited().contains("missing"));
    }

    #[test]
    fn test_resolve_relative_link() {
        let resolved = resolve_link("https://example.com/page", "/docs");
        assert_eq!(resolved, "https://example.com/docs");
    }

    #[test]
    fn test_resolve_protocol_relative_link() {
        let resolved = resolve_link("https://example.com/page", "//cdn.example.net/app.js");
        assert_eq!(resolved, "https://cdn.example.net/app.js");
    }

    #[test]
    fn test_non_root_links_kept_verbatim() {
        assert_eq!(resolve_link("https://example.com/a/", "b.html"), "b.html");
        assert_eq!(resolve_link("https://example.com/", "https://other.com"), "https://other.com");
        assert_eq!(resolve_link("https://example.com/", "#top"), "#top");
    }

    #[test]
    fn test_opaque_base_keeps_raw_link() {
        assert_eq!(resolve_link("A", "/x"), "/x");
    }
}
