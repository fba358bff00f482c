// src/fetch/http.rs
// =============================================================================
// Fetches pages over HTTP with reqwest.
//
// Key functionality:
// - One shared Client (connection pooling, timeout, redirect limit)
// - Non-2xx responses are failures, not bodies
// - reqwest errors are sorted into FetchError variants so the logs say
//   whether it was a timeout, a connection problem, or something else
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::Fetcher;
use crate::crawl::FetchError;

/// Follow up to this many redirects before giving up.
const MAX_REDIRECTS: usize = 5;

/// reqwest-backed [`Fetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher with a per-request timeout and a user agent.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wraps a client the caller has already configured.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, address: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(address)
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))
    }
}

// Sorts a reqwest error into a FetchError variant
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else if error.is_redirect() {
        FetchError::Other("too many redirects".to_string())
    } else if let Some(status) = error.status() {
        FetchError::Status {
            code: status.as_u16(),
        }
    } else {
        FetchError::Other(error.to_string())
    }
}
