//! AI news from company blogs and tech media feeds.

use chrono::Utc;

use super::{Agent, Services};
use crate::error::StoreError;
use crate::extract::feed::extract_articles;
use crate::fetch::Fetch;
use crate::models::Category;
use crate::sources::{NamedSource, Registry};

pub struct NewsAgent<'a, F> {
    services: &'a Services<F>,
    feeds: &'a [NamedSource],
}

impl<'a, F: Fetch> NewsAgent<'a, F> {
    pub fn new(services: &'a Services<F>, registry: &'a Registry) -> Self {
        Self {
            services,
            feeds: &registry.news_feeds,
        }
    }
}

impl<F: Fetch> Agent for NewsAgent<'_, F> {
    fn category(&self) -> Category {
        Category::News
    }

    async fn collect(&self) -> Result<usize, StoreError> {
        let mut total = 0;
        for source in self.feeds {
            let articles = match self.services.fetch_feed(&source.name, &source.url).await {
                Some(feed) => extract_articles(&feed, &source.name, Utc::now()),
                None => Vec::new(),
            };
            total += self
                .services
                .store_batch(self.category(), &source.name, articles)
                .await?;
            self.services.pause(self.services.pacing.feed_delay).await;
        }
        self.services.finish(self.category(), total).await
    }
}
