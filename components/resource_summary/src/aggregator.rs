//! Resource summary aggregation
//!
//! Host patterns and favicon candidates are resolved once per page and shared
//! read-only by every record (and every worker in the parallel form).

use crate::budget::Budget;
use crate::classifier::classify;
use crate::entity::EntityClassification;
use crate::favicon::favicon_candidates;
use crate::party::{first_party_hosts, is_first_party};
use crate::types::{BudgetResourceType, LinkElement, PageUrl, ResourceSummary};
use network_records::NetworkRequestRecord;
use std::collections::HashSet;
use std::thread;
use tracing::debug;

/// Per-page classification state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPlan {
    host_patterns: Vec<String>,
    favicon_urls: HashSet<String>,
}

impl SummaryPlan {
    /// Resolve first-party host patterns and favicon candidates for a page
    pub fn resolve(
        page_url: &PageUrl,
        budgets: &[Budget],
        link_elements: &[LinkElement],
        classification: Option<&EntityClassification>,
    ) -> Self {
        let main_document_url = page_url.main_document_url.as_deref();
        let budget = main_document_url.and_then(|url| Budget::matching(budgets, url));
        let host_patterns = first_party_hosts(budget, classification, page_url);
        let favicon_urls = favicon_candidates(link_elements, main_document_url);

        debug!(
            "First-party host patterns: {:?}, {} favicon candidates",
            host_patterns,
            favicon_urls.len()
        );

        Self {
            host_patterns,
            favicon_urls,
        }
    }

    pub fn host_patterns(&self) -> &[String] {
        &self.host_patterns
    }

    pub fn favicon_urls(&self) -> &HashSet<String> {
        &self.favicon_urls
    }

    /// Whether a record is left out of the summary entirely
    ///
    /// Only untyped ("other") requests to a favicon candidate are dropped; a
    /// favicon served with another resource type still counts.
    pub fn is_excluded(&self, record: &NetworkRequestRecord) -> bool {
        let ambiguous_favicon = classify(record) == BudgetResourceType::Other
            && self.favicon_urls.contains(&record.url);
        ambiguous_favicon || record.is_non_network_request()
    }

    /// Add one record to its bucket, the total and, when not first party, third-party
    pub fn accumulate(&self, summary: &mut ResourceSummary, record: &NetworkRequestRecord) {
        let (resource_size, transfer_size) = (record.resource_size, record.transfer_size);

        summary[classify(record)].add_request(resource_size, transfer_size);
        summary[BudgetResourceType::Total].add_request(resource_size, transfer_size);
        if !is_first_party(&record.url, &self.host_patterns) {
            summary[BudgetResourceType::ThirdParty].add_request(resource_size, transfer_size);
        }
    }

    /// Summarize records with this plan
    pub fn summarize(&self, records: &[NetworkRequestRecord]) -> ResourceSummary {
        let mut summary = ResourceSummary::new();
        for record in records.iter().filter(|record| !self.is_excluded(record)) {
            self.accumulate(&mut summary, record);
        }
        summary
    }

    /// Summarize records in chunks of at least `chunk_size` on scoped worker threads
    ///
    /// At most [`thread::available_parallelism`] workers run; chunks grow to
    /// cover the records with that many threads. Produces exactly what
    /// [`SummaryPlan::summarize`] produces.
    pub fn summarize_parallel(
        &self,
        records: &[NetworkRequestRecord],
        chunk_size: usize,
    ) -> ResourceSummary {
        let workers = thread::available_parallelism().map_or(1, |n| n.get());
        let chunk_size = worker_chunk_size(records.len(), chunk_size, workers);
        if records.len() <= chunk_size {
            return self.summarize(records);
        }

        debug!(
            "Summarizing {} records in chunks of {}",
            records.len(),
            chunk_size
        );
        thread::scope(|scope| {
            let workers: Vec<_> = records
                .chunks(chunk_size)
                .map(|chunk| scope.spawn(move || self.summarize(chunk)))
                .collect();

            workers
                .into_iter()
                .fold(ResourceSummary::new(), |mut summary, worker| {
                    let partial = match worker.join() {
                        Ok(partial) => partial,
                        Err(panic) => std::panic::resume_unwind(panic),
                    };
                    summary.merge(&partial);
                    summary
                })
        })
    }
}

/// Chunk length that splits `len` records across at most `workers` threads
fn worker_chunk_size(len: usize, chunk_size: usize, workers: usize) -> usize {
    let workers = workers.max(1);
    chunk_size.max(1).max(len.div_ceil(workers))
}

/// Summarize the requests of one page load
pub fn summarize(
    records: &[NetworkRequestRecord],
    page_url: &PageUrl,
    budgets: &[Budget],
    link_elements: &[LinkElement],
    classification: Option<&EntityClassification>,
) -> ResourceSummary {
    let plan = SummaryPlan::resolve(page_url, budgets, link_elements, classification);
    let summary = plan.summarize(records);
    debug!(
        "Summarized {} of {} records",
        summary[BudgetResourceType::Total].count,
        records.len()
    );
    summary
}

/// [`summarize`] with records split across worker threads
pub fn summarize_parallel(
    records: &[NetworkRequestRecord],
    page_url: &PageUrl,
    budgets: &[Budget],
    link_elements: &[LinkElement],
    classification: Option<&EntityClassification>,
    chunk_size: usize,
) -> ResourceSummary {
    SummaryPlan::resolve(page_url, budgets, link_elements, classification)
        .summarize_parallel(records, chunk_size)
}
