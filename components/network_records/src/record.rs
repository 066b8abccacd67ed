//! Network request records

use cdp_types::domains::network::ResourceType;
use serde::{Deserialize, Serialize};
use url::Url;

/// URL schemes and protocols that never reach the network stack
pub const NON_NETWORK_PROTOCOLS: &[&str] = &[
    "about",
    "blob",
    "chrome-extension",
    "data",
    "file",
    "filesystem",
    "intent",
];

/// A single request observed while the page loaded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRequestRecord {
    /// Protocol request identifier (redirect hops carry a `:redirect` suffix)
    pub request_id: String,
    /// Absolute request URL
    pub url: String,
    /// Resource type reported by the browser, if any
    #[serde(default)]
    pub resource_type: Option<ResourceType>,
    /// Decoded body size in bytes
    #[serde(default)]
    pub resource_size: u64,
    /// Bytes transferred over the wire, headers included
    #[serde(default)]
    pub transfer_size: u64,
    /// Protocol reported with the response (`h2`, `http/1.1`, `data`, ...)
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub status_code: Option<u32>,
    /// Whether loading finished (successfully or via redirect)
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub failed: bool,
    #[serde(default)]
    pub from_cache: bool,
}

impl NetworkRequestRecord {
    /// Create a record with no type and zero sizes
    pub fn new(request_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            url: url.into(),
            resource_type: None,
            resource_size: 0,
            transfer_size: 0,
            protocol: None,
            mime_type: None,
            status_code: None,
            finished: false,
            failed: false,
            from_cache: false,
        }
    }

    /// Set the resource type
    pub fn with_resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = Some(resource_type);
        self
    }

    /// Set resource and transfer sizes
    pub fn with_sizes(mut self, resource_size: u64, transfer_size: u64) -> Self {
        self.resource_size = resource_size;
        self.transfer_size = transfer_size;
        self
    }

    /// Set the reported protocol
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// URL scheme, if the URL parses
    pub fn scheme(&self) -> Option<String> {
        Url::parse(&self.url).ok().map(|url| url.scheme().to_string())
    }

    /// Whether this request was served without touching the network stack
    ///
    /// Checks both the reported protocol and the URL scheme.
    pub fn is_non_network_request(&self) -> bool {
        if let Some(protocol) = &self.protocol {
            if is_non_network_protocol(protocol) {
                return true;
            }
        }
        self.scheme()
            .map(|scheme| is_non_network_protocol(&scheme))
            .unwrap_or(false)
    }
}

/// Whether `protocol` (with or without a trailing `:`) is a non-network protocol
pub fn is_non_network_protocol(protocol: &str) -> bool {
    let protocol = protocol.trim_end_matches(':').to_ascii_lowercase();
    NON_NETWORK_PROTOCOLS.contains(&protocol.as_str())
}
