//! Trending repositories, daily and weekly.

use chrono::Utc;

use super::{Agent, Services};
use crate::error::StoreError;
use crate::extract::trending::extract_repos;
use crate::fetch::Fetch;
use crate::models::Category;
use crate::sources::{NamedSource, Registry};

pub struct GithubAgent<'a, F> {
    services: &'a Services<F>,
    pages: &'a [NamedSource],
}

impl<'a, F: Fetch> GithubAgent<'a, F> {
    pub fn new(services: &'a Services<F>, registry: &'a Registry) -> Self {
        Self {
            services,
            pages: &registry.trending_pages,
        }
    }
}

impl<F: Fetch> Agent for GithubAgent<'_, F> {
    fn category(&self) -> Category {
        Category::Github
    }

    async fn collect(&self) -> Result<usize, StoreError> {
        let mut total = 0;
        for page in self.pages {
            let repos = match self.services.fetch_page(&page.name, &page.url).await {
                Some(html) => extract_repos(&html, &page.name, Utc::now()),
                None => Vec::new(),
            };
            total += self
                .services
                .store_batch(self.category(), &page.name, repos)
                .await?;
            self.services.pause(self.services.pacing.scrape_delay).await;
        }
        self.services.finish(self.category(), total).await
    }
}
