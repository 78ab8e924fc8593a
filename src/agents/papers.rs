//! Research papers from arXiv categories and paper aggregators.

use chrono::Utc;

use super::{Agent, Services};
use crate::error::StoreError;
use crate::extract::feed::extract_papers;
use crate::fetch::Fetch;
use crate::models::Category;
use crate::sources::{NamedSource, Registry};

pub struct PapersAgent<'a, F> {
    services: &'a Services<F>,
    feeds: &'a [NamedSource],
    conference_keywords: &'a [String],
}

impl<'a, F: Fetch> PapersAgent<'a, F> {
    pub fn new(services: &'a Services<F>, registry: &'a Registry) -> Self {
        Self {
            services,
            feeds: &registry.paper_feeds,
            conference_keywords: &registry.conference_keywords,
        }
    }
}

impl<F: Fetch> Agent for PapersAgent<'_, F> {
    fn category(&self) -> Category {
        Category::Papers
    }

    async fn collect(&self) -> Result<usize, StoreError> {
        let mut total = 0;
        for source in self.feeds {
            let papers = match self.services.fetch_feed(&source.name, &source.url).await {
                Some(feed) => {
                    extract_papers(&feed, &source.name, Utc::now(), self.conference_keywords)
                }
                None => Vec::new(),
            };
            total += self
                .services
                .store_batch(self.category(), &source.name, papers)
                .await?;
            self.services.pause(self.services.pacing.feed_delay).await;
        }
        self.services.finish(self.category(), total).await
    }
}
