//! Government and institutional grant schemes, scraped from portal pages.

use chrono::Utc;

use super::{Agent, Services};
use crate::error::StoreError;
use crate::extract::heuristic::{KeywordRules, extract_listings};
use crate::fetch::Fetch;
use crate::models::{Category, Grant};
use crate::sources::{Registry, ScrapeTarget};

pub struct GrantsAgent<'a, F> {
    services: &'a Services<F>,
    targets: &'a [ScrapeTarget],
    rules: KeywordRules,
}

impl<'a, F: Fetch> GrantsAgent<'a, F> {
    pub fn new(services: &'a Services<F>, registry: &'a Registry) -> Self {
        Self {
            services,
            targets: &registry.grant_sources,
            rules: KeywordRules::grants(),
        }
    }

    async fn scrape(&self, target: &ScrapeTarget) -> Vec<Grant> {
        let Some(html) = self.services.fetch_page(&target.name, &target.url).await else {
            return Vec::new();
        };
        extract_listings(&html, target, &self.rules, Utc::now())
            .into_iter()
            .map(|base| Grant {
                base,
                region: target.tag.clone(),
                deadline: None,
            })
            .collect()
    }
}

impl<F: Fetch> Agent for GrantsAgent<'_, F> {
    fn category(&self) -> Category {
        Category::Grants
    }

    async fn collect(&self) -> Result<usize, StoreError> {
        let mut total = 0;
        for target in self.targets {
            let grants = self.scrape(target).await;
            total += self
                .services
                .store_batch(self.category(), &target.name, grants)
                .await?;
            self.services.pause(self.services.pacing.scrape_delay).await;
        }
        self.services.finish(self.category(), total).await
    }
}
