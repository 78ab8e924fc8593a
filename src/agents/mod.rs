//! Collection agents, one per category.
//!
//! Every agent follows the same loop over its sources, one source at a time:
//!
//! 1. **Fetch** the feed or page; a failure is logged and the source yields nothing
//! 2. **Extract** records from the body
//! 3. **Dedup** the batch (same link or same normalized title)
//! 4. **Store** it in today's file for the category (dedup by link against earlier runs)
//! 5. **Pause** before the next source
//!
//! After the last source the agent purges its category's expired files.
//!
//! # Agents
//!
//! | Agent | Module | Sources | Extractor | Pause |
//! |-------|--------|---------|-----------|-------|
//! | news | [`news`] | RSS/Atom | [`feed`](crate::extract::feed) | 1s |
//! | papers | [`papers`] | RSS/Atom | [`feed`](crate::extract::feed) | 1s |
//! | grants | [`grants`] | portal pages | [`heuristic`](crate::extract::heuristic) | 2s |
//! | funding | [`funding`] | program pages | [`heuristic`](crate::extract::heuristic) | 2s |
//! | github | [`github`] | trending pages | [`trending`](crate::extract::trending) | 2s |
//!
//! Only storage errors stop an agent. [`collect_all`] runs every agent and
//! logs a failing agent without stopping the others.

use feed_rs::model::Feed;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::error::StoreError;
use crate::extract::{dedup::dedup_batch, feed};
use crate::fetch::Fetch;
use crate::models::{Category, Record};
use crate::sources::Registry;
use crate::store::{self, DailyStore};

pub mod funding;
pub mod github;
pub mod grants;
pub mod news;
pub mod papers;

/// A category-specific collection strategy.
pub trait Agent {
    fn category(&self) -> Category;

    /// Run one pass over every source. Returns the number of new records stored.
    async fn collect(&self) -> Result<usize, StoreError>;
}

/// Delays between consecutive sources within one agent run.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub feed_delay: Duration,
    pub scrape_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            feed_delay: Duration::from_secs(1),
            scrape_delay: Duration::from_secs(2),
        }
    }
}

/// What every agent shares: the network, the store and the run settings.
#[derive(Debug)]
pub struct Services<F> {
    pub fetcher: F,
    pub store: DailyStore,
    pub retention_days: u32,
    pub pacing: Pacing,
}

impl<F: Fetch> Services<F> {
    /// Parsed feed, or `None` after logging why not.
    pub async fn fetch_feed(&self, name: &str, url: &str) -> Option<Feed> {
        match self.fetcher.feed(url).await.and_then(|body| feed::parse(&body)) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(source = name, %url, error = %e, "Error fetching feed");
                None
            }
        }
    }

    /// Page body, or `None` after logging why not.
    pub async fn fetch_page(&self, name: &str, url: &str) -> Option<String> {
        match self.fetcher.page(url).await {
            Ok(body) => Some(body),
            Err(e) => {
                warn!(source = name, %url, error = %e, "Error fetching page");
                None
            }
        }
    }

    /// Dedup one source's batch, add it to today's file and log the outcome.
    pub async fn store_batch<T: Record>(
        &self,
        category: Category,
        source: &str,
        batch: Vec<T>,
    ) -> Result<usize, StoreError> {
        let batch = dedup_batch(batch);
        let fetched = batch.len();
        let added = if batch.is_empty() {
            0
        } else {
            self.store.add(category, batch, store::today()).await?
        };
        info!(%category, source, fetched, added, "Source collected");
        Ok(added)
    }

    pub async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }

    /// Purge expired files for `category` and report the run total.
    pub async fn finish(&self, category: Category, total: usize) -> Result<usize, StoreError> {
        let purged = self
            .store
            .purge(self.retention_days, Some(category), store::today())
            .await?;
        info!(%category, new_items = total, purged, "Collection finished");
        Ok(total)
    }
}

/// Run the agent for `category`.
#[instrument(level = "info", skip(services, registry))]
pub async fn run_agent<F: Fetch>(
    services: &Services<F>,
    registry: &Registry,
    category: Category,
) -> Result<usize, StoreError> {
    info!(%category, "Agent starting collection");
    match category {
        Category::News => news::NewsAgent::new(services, registry).collect().await,
        Category::Papers => papers::PapersAgent::new(services, registry).collect().await,
        Category::Grants => grants::GrantsAgent::new(services, registry).collect().await,
        Category::Funding => funding::FundingAgent::new(services, registry).collect().await,
        Category::Github => github::GithubAgent::new(services, registry).collect().await,
    }
}

/// Run every agent in turn. A failing agent is logged and skipped.
///
/// Returns the number of new records across all agents.
pub async fn collect_all<F: Fetch>(services: &Services<F>, registry: &Registry) -> usize {
    let mut total = 0;
    for category in Category::ALL {
        match run_agent(services, registry, category).await {
            Ok(added) => total += added,
            Err(e) => error!(%category, error = %e, "Agent failed"),
        }
    }
    total
}

#[cfg(test)]
pub(crate) mod testing {
    //! Offline fixtures for agent tests.

    use std::collections::HashMap;

    use super::*;
    use crate::error::FetchError;

    /// Serves canned bodies by URL; unknown URLs answer 404.
    #[derive(Debug, Default)]
    pub struct StaticFetcher {
        pub pages: HashMap<String, String>,
        pub feeds: HashMap<String, Vec<u8>>,
    }

    impl StaticFetcher {
        pub fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        pub fn with_feed(mut self, url: &str, body: &str) -> Self {
            self.feeds.insert(url.to_string(), body.as_bytes().to_vec());
            self
        }
    }

    fn not_found(url: &str) -> FetchError {
        FetchError::Status {
            status: 404,
            url: url.to_string(),
        }
    }

    impl Fetch for StaticFetcher {
        async fn page(&self, url: &str) -> Result<String, FetchError> {
            self.pages.get(url).cloned().ok_or_else(|| not_found(url))
        }

        async fn feed(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.feeds.get(url).cloned().ok_or_else(|| not_found(url))
        }
    }

    pub fn services(fetcher: StaticFetcher, root: &std::path::Path) -> Services<StaticFetcher> {
        Services {
            fetcher,
            store: DailyStore::new(root),
            retention_days: store::DEFAULT_RETENTION_DAYS,
            pacing: Pacing {
                feed_delay: Duration::ZERO,
                scrape_delay: Duration::ZERO,
            },
        }
    }

    /// Registry with every source list emptied.
    pub fn empty_registry() -> Registry {
        Registry {
            news_feeds: Vec::new(),
            paper_feeds: Vec::new(),
            grant_sources: Vec::new(),
            funding_sources: Vec::new(),
            trending_pages: Vec::new(),
            ..Registry::default()
        }
    }
}
