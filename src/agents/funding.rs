//! Accelerator, incubator and investor programs, scraped from program pages.

use chrono::Utc;

use super::{Agent, Services};
use crate::error::StoreError;
use crate::extract::heuristic::{KeywordRules, extract_listings};
use crate::fetch::Fetch;
use crate::models::{Category, Funding};
use crate::sources::{Registry, ScrapeTarget};

pub struct FundingAgent<'a, F> {
    services: &'a Services<F>,
    targets: &'a [ScrapeTarget],
    rules: KeywordRules,
}

impl<'a, F: Fetch> FundingAgent<'a, F> {
    pub fn new(services: &'a Services<F>, registry: &'a Registry) -> Self {
        Self {
            services,
            targets: &registry.funding_sources,
            rules: KeywordRules::funding(),
        }
    }
}

impl<F: Fetch> Agent for FundingAgent<'_, F> {
    fn category(&self) -> Category {
        Category::Funding
    }

    async fn collect(&self) -> Result<usize, StoreError> {
        let mut total = 0;
        for target in self.targets {
            let programs: Vec<Funding> =
                match self.services.fetch_page(&target.name, &target.url).await {
                    Some(html) => extract_listings(&html, target, &self.rules, Utc::now())
                        .into_iter()
                        .map(|base| Funding {
                            base,
                            kind: target.tag.clone(),
                            deadline: None,
                        })
                        .collect(),
                    None => Vec::new(),
                };
            total += self
                .services
                .store_batch(self.category(), &target.name, programs)
                .await?;
            self.services.pause(self.services.pacing.scrape_delay).await;
        }
        self.services.finish(self.category(), total).await
    }
}
