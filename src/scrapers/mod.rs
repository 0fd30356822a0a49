//! Source page retrieval and parsing.
//!
//! Scraping happens in two steps:
//!
//! 1. **Fetching**: [`Fetcher::fetch`] downloads the raw HTML of the source page
//! 2. **Extraction**: [`bbc::extract_articles`] turns that HTML into [`Article`]s
//!
//! There is a single source and a single request per run. A failed request is
//! reported to the caller and never retried.
//!
//! [`Article`]: crate::models::Article

pub mod bbc;

use crate::error::FetchError;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// User agent sent with the page request.
pub const USER_AGENT: &str = concat!("news_clusters/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the source page.
///
/// The underlying transport has no timeout of its own, so one is always set
/// here; a hung connection would otherwise block the run forever.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }

    /// GET `url` and return the body.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Status`] for any non-2xx response; the body is discarded
    /// - [`FetchError::Timeout`] when the request exceeds the configured timeout
    /// - [`FetchError::Http`] for other transport failures
    #[instrument(level = "info", skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Source page request failed");
            return Err(FetchError::Status {
                url: url.to_string(),
                status_code: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        info!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched source page"
        );
        Ok(body)
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Http(e)
        }
    }
}
