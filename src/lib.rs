//! Page load resource summary
//!
//! Facade over the workspace components: rebuild network records from a
//! DevTools log, then summarize them per resource type with first-party and
//! favicon handling.
//!
//! # Example
//!
//! ```no_run
//! use corten_resource_summary::{PageUrl, ResourceSummaryComputer, SummaryRequest};
//! use corten_resource_summary::cdp::DevtoolsLog;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let log = DevtoolsLog::from_json(&std::fs::read_to_string("page.devtoolslog.json")?)?;
//!     let request = SummaryRequest::new(PageUrl::new("https://example.com/"), log);
//!
//!     let computer = ResourceSummaryComputer::default();
//!     let summary = computer.request(&request).await?;
//!     println!("{}", serde_json::to_string_pretty(&*summary)?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// DevTools protocol types
pub mod cdp {
    pub use cdp_types::domains::network::ResourceType;
    pub use cdp_types::{CdpEvent, DevtoolsLog};
}

/// Network records rebuilt from a DevTools log
pub mod records {
    pub use network_records::{
        is_non_network_protocol, DevtoolsLogRecordsProvider, NetworkRecorder,
        NetworkRecordsProvider, NetworkRequestRecord, RecordParsingError,
    };
}

pub use resource_summary::*;
