//! Memoized resource summary artifact
//!
//! Wraps the pure summary in a per-session cache keyed by the canonical JSON
//! form of the request. Concurrent requests for the same key share a single
//! computation; failed computations are not cached.

use crate::aggregator::{summarize, summarize_parallel};
use crate::budget::Budget;
use crate::cache::{ArtifactCache, CacheStats};
use crate::config::SummaryConfig;
use crate::entity::{EntityClassificationProvider, EntityClassifier};
use crate::error::Result;
use crate::types::{BudgetResourceType, LinkElement, PageUrl, ResourceSummary};
use cdp_types::DevtoolsLog;
use network_records::{DevtoolsLogRecordsProvider, NetworkRecordsProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Inputs of one resource summary computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRequest {
    #[serde(rename = "URL")]
    pub url: PageUrl,
    #[serde(rename = "devtoolsLog")]
    pub devtools_log: DevtoolsLog,
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(rename = "LinkElements", default)]
    pub link_elements: Vec<LinkElement>,
}

impl SummaryRequest {
    pub fn new(url: PageUrl, devtools_log: DevtoolsLog) -> Self {
        Self {
            url,
            devtools_log,
            budgets: Vec::new(),
            link_elements: Vec::new(),
        }
    }

    pub fn with_budgets(mut self, budgets: Vec<Budget>) -> Self {
        self.budgets = budgets;
        self
    }

    pub fn with_link_elements(mut self, link_elements: Vec<LinkElement>) -> Self {
        self.link_elements = link_elements;
        self
    }

    /// Canonical cache key; equal requests produce equal keys
    pub fn cache_key(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

type SummaryCell = Arc<OnceCell<Arc<ResourceSummary>>>;

/// Computes and memoizes resource summaries
pub struct ResourceSummaryComputer {
    config: SummaryConfig,
    records_provider: Arc<dyn NetworkRecordsProvider>,
    entity_provider: Arc<dyn EntityClassificationProvider>,
    cache: ArtifactCache<SummaryCell>,
}

impl ResourceSummaryComputer {
    /// Computer that rebuilds records from the DevTools log and infers
    /// entities from root domains
    pub fn new(config: SummaryConfig) -> Self {
        Self::with_providers(
            config,
            Arc::new(DevtoolsLogRecordsProvider::new()),
            Arc::new(EntityClassifier::new()),
        )
    }

    /// Computer with custom collaborators
    pub fn with_providers(
        config: SummaryConfig,
        records_provider: Arc<dyn NetworkRecordsProvider>,
        entity_provider: Arc<dyn EntityClassificationProvider>,
    ) -> Self {
        let cache = ArtifactCache::with_capacity(config.cache_capacity());
        Self {
            config,
            records_provider,
            entity_provider,
            cache,
        }
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Summary for `request`, computed at most once per distinct request
    pub async fn request(&self, request: &SummaryRequest) -> Result<Arc<ResourceSummary>> {
        let key = request.cache_key()?;
        let (cell, _) = self.cache.slot(&key, || Arc::new(OnceCell::new()));

        // An empty cell is either in flight or left behind by a failed computation
        if let Some(summary) = cell.get() {
            self.cache.record_hit();
            debug!("Resource summary served from cache");
            return Ok(Arc::clone(summary));
        }
        self.cache.record_miss();

        let summary = cell.get_or_try_init(|| self.compute(request)).await?;
        Ok(Arc::clone(summary))
    }

    async fn compute(&self, request: &SummaryRequest) -> Result<Arc<ResourceSummary>> {
        for budget in &request.budgets {
            budget.validate()?;
        }

        let records = self.records_provider.request(&request.devtools_log).await?;
        let classification = self
            .entity_provider
            .request(&request.url, &records)
            .await?;

        let summary = if self.config.parallel() {
            summarize_parallel(
                &records,
                &request.url,
                &request.budgets,
                &request.link_elements,
                Some(&classification),
                self.config.parallel_chunk_size(),
            )
        } else {
            summarize(
                &records,
                &request.url,
                &request.budgets,
                &request.link_elements,
                Some(&classification),
            )
        };

        info!(
            "Computed resource summary for {}: {} requests",
            request.url.final_displayed_url,
            summary[BudgetResourceType::Total].count
        );
        Ok(Arc::new(summary))
    }

    /// Cache statistics for this session
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every memoized summary
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

impl Default for ResourceSummaryComputer {
    fn default() -> Self {
        Self::new(SummaryConfig::default())
    }
}
