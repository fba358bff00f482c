// src/config.rs
// =============================================================================
// Crawl configuration.
//
// Values come from (lowest to highest priority):
// 1. Built-in defaults (max depth 2, 10 second timeout)
// 2. An optional JSON file passed with --config
// 3. Command-line flags
//
// max_depth is signed. Negative values are rejected by validate() with a
// ConstructionError when the crawler is built.
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::crawl::{validate_max_depth, ConstructionError, DEFAULT_MAX_DEPTH};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("breadth-crawler/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// How many link-hops from a seed are still fetched.
    pub max_depth: i64,
    /// Per-request timeout for the HTTP fetcher.
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: i64::from(DEFAULT_MAX_DEPTH),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CrawlConfig {
    pub fn with_max_depth(mut self, max_depth: i64) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Loads a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Checks the depth bound and returns it in the engine's unsigned form.
    pub fn validate(&self) -> std::result::Result<u32, ConstructionError> {
        validate_max_depth(self.max_depth)
    }
}
