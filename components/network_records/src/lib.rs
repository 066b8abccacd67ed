//! Network request records rebuilt from a DevTools log
//!
//! This crate turns the `Network` domain events captured during a page load
//! into one [`NetworkRequestRecord`] per request (redirect hops included) and
//! tells network requests apart from those served by non-network protocols
//! such as `data:` or `blob:`.
//!
//! # Example
//!
//! ```
//! use cdp_types::{CdpEvent, DevtoolsLog};
//! use network_records::NetworkRecorder;
//! use serde_json::json;
//!
//! let log = DevtoolsLog::new(vec![CdpEvent::new(
//!     "Network.requestWillBeSent",
//!     json!({"requestId": "1", "request": {"url": "https://example.com/"}, "type": "Document"}),
//! )]);
//!
//! let records = NetworkRecorder::records_from_log(&log).unwrap();
//! assert_eq!(records[0].url, "https://example.com/");
//! ```

mod error;
mod record;
mod recorder;

pub use error::{RecordParsingError, Result};
pub use record::{is_non_network_protocol, NetworkRequestRecord, NON_NETWORK_PROTOCOLS};
pub use recorder::{NetworkRecorder, REDIRECT_SUFFIX};

use async_trait::async_trait;
use cdp_types::DevtoolsLog;

/// Source of the network records for a page load
#[async_trait]
pub trait NetworkRecordsProvider: Send + Sync {
    /// Return the records contained in `devtools_log`, in request order
    async fn request(&self, devtools_log: &DevtoolsLog) -> Result<Vec<NetworkRequestRecord>>;
}

/// Provider that rebuilds records straight from the log's `Network` events
#[derive(Debug, Clone, Copy, Default)]
pub struct DevtoolsLogRecordsProvider;

impl DevtoolsLogRecordsProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NetworkRecordsProvider for DevtoolsLogRecordsProvider {
    async fn request(&self, devtools_log: &DevtoolsLog) -> Result<Vec<NetworkRequestRecord>> {
        NetworkRecorder::records_from_log(devtools_log)
    }
}
