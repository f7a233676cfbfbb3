//! External paste-service resolution.
//!
//! Messages sometimes carry a link to a paste service instead of inline
//! code. The extractor resolves those through a [`PasteFetcher`] and treats
//! the body as one more candidate. Fetch failures and timeouts are never
//! engine errors; the candidate is simply dropped.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

/// Default timeout for paste lookups. Paste bodies are small; anything
/// slower than this is treated as "no paste content".
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from a single paste lookup.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected status: HTTP {0}")]
    Status(u16),
}

/// Collaborator that resolves a paste URL to its body.
///
/// Implementations must be timeout-bounded and must swallow their own
/// failures: `None` means "no paste content", whatever the cause.
#[async_trait]
pub trait PasteFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<String>;
}

/// HTTP paste fetcher.
pub struct HttpPasteFetcher {
    http: reqwest::Client,
    timeout: Duration,
}

impl HttpPasteFetcher {
    pub fn new(timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("autohelp/0.1.0")
            .build()
            .expect("failed to create HTTP client");

        Self { http, timeout }
    }

    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .http
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Network(e)
                }
            })?;

        match response.status().as_u16() {
            200 => Ok(response.text().await?),
            status => Err(FetchError::Status(status)),
        }
    }
}

impl Default for HttpPasteFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_TIMEOUT)
    }
}

#[async_trait]
impl PasteFetcher for HttpPasteFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        match self.get(url).await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(url, error = %e, "paste fetch failed, dropping candidate");
                None
            }
        }
    }
}
