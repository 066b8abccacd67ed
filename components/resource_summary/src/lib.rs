//! Resource usage summary for a page load
//!
//! Counts the requests a page made and the bytes they cost, per resource
//! type, in total, and for third-party hosts. Requests served without the
//! network (`data:`, `blob:`, ...) and untyped requests to a favicon candidate
//! are left out so the summary is stable across runs.
//!
//! # Example
//!
//! ```
//! use cdp_types::domains::network::ResourceType;
//! use network_records::NetworkRequestRecord;
//! use resource_summary::{summarize, Budget, BudgetResourceType, PageUrl};
//!
//! let records = vec![
//!     NetworkRequestRecord::new("1", "https://cdn.example.com/a.js")
//!         .with_resource_type(ResourceType::Script)
//!         .with_sizes(1000, 400),
//!     NetworkRequestRecord::new("2", "https://other.com/b.js")
//!         .with_resource_type(ResourceType::Script)
//!         .with_sizes(500, 200),
//! ];
//! let budgets = vec![Budget::with_first_party_hostnames(["*.example.com"])];
//!
//! let summary = summarize(
//!     &records,
//!     &PageUrl::new("https://www.example.com/"),
//!     &budgets,
//!     &[],
//!     None,
//! );
//! assert_eq!(summary[BudgetResourceType::Script].count, 2);
//! assert_eq!(summary[BudgetResourceType::ThirdParty].transfer_size, 200);
//! ```

mod aggregator;
mod budget;
mod cache;
mod classifier;
mod computed;
mod config;
mod entity;
mod error;
mod favicon;
mod party;
mod types;

pub use aggregator::{summarize, summarize_parallel, SummaryPlan};
pub use budget::{
    Budget, BudgetOptions, ResourceBudget, TimingBudget, TimingMetric, DEFAULT_BUDGET_PATH,
};
pub use cache::{ArtifactCache, CacheStats, DEFAULT_CACHE_CAPACITY};
pub use classifier::{budget_resource_type, classify};
pub use computed::{ResourceSummaryComputer, SummaryRequest};
pub use config::{SummaryConfig, SummaryConfigBuilder, DEFAULT_PARALLEL_CHUNK_SIZE};
pub use entity::{
    root_domain, Entity, EntityClassification, EntityClassificationProvider, EntityClassifier,
};
pub use error::{BudgetConfigError, EntityClassificationError, Result, SummaryError};
pub use favicon::{favicon_candidates, DEFAULT_FAVICON_PATH};
pub use party::{first_party_hosts, is_first_party};
pub use types::{BudgetResourceType, LinkElement, PageUrl, ResourceEntry, ResourceSummary};
