//! HTTP access for agents.
//!
//! The [`Fetch`] trait is the seam between agents and the network: the
//! production [`HttpFetcher`] talks to real sources, and tests substitute
//! canned pages. Errors are returned, never logged here; each agent logs
//! them per source and moves on.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::FetchError;

/// Request timeout for scraped pages.
pub const SCRAPE_TIMEOUT: Duration = Duration::from_secs(15);

/// Desktop browser user agent sent with scrape requests.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Source of raw page and feed bodies.
pub trait Fetch {
    /// Body of an HTML page.
    async fn page(&self, url: &str) -> Result<String, FetchError>;

    /// Raw bytes of a syndication feed.
    async fn feed(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// [`Fetch`] over `reqwest`.
///
/// Pages are requested with [`BROWSER_USER_AGENT`] and [`SCRAPE_TIMEOUT`].
/// Feed requests carry no explicit timeout and rely on the connection
/// failing on its own.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    pages: Client,
    feeds: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let pages = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(SCRAPE_TIMEOUT)
            .build()?;
        let feeds = Client::builder()
            .user_agent(concat!("daily_briefing/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { pages, feeds })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn page(&self, url: &str) -> Result<String, FetchError> {
        let response = self.pages.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }

    #[instrument(level = "debug", skip(self))]
    async fn feed(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.feeds.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.bytes().await?;
        debug!(bytes = body.len(), "Fetched feed");
        Ok(body.to_vec())
    }
}
