// Network domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// `Network.requestWillBeSent`
pub const REQUEST_WILL_BE_SENT: &str = "Network.requestWillBeSent";
/// `Network.responseReceived`
pub const RESPONSE_RECEIVED: &str = "Network.responseReceived";
/// `Network.dataReceived`
pub const DATA_RECEIVED: &str = "Network.dataReceived";
/// `Network.loadingFinished`
pub const LOADING_FINISHED: &str = "Network.loadingFinished";
/// `Network.loadingFailed`
pub const LOADING_FAILED: &str = "Network.loadingFailed";
/// `Network.requestServedFromCache`
pub const REQUEST_SERVED_FROM_CACHE: &str = "Network.requestServedFromCache";

/// Unique request identifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Timestamp (seconds since epoch with millisecond precision)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Timestamp(pub f64);

/// Resource type as reported by the browser.
///
/// Any label the protocol adds in the future deserializes to [`ResourceType::Other`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum ResourceType {
    Document,
    Stylesheet,
    Image,
    Media,
    Font,
    Script,
    TextTrack,
    XHR,
    Fetch,
    Prefetch,
    EventSource,
    WebSocket,
    Manifest,
    SignedExchange,
    Ping,
    CSPViolationReport,
    Preflight,
    Other,
}

impl ResourceType {
    /// Protocol label for this resource type
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Document => "Document",
            ResourceType::Stylesheet => "Stylesheet",
            ResourceType::Image => "Image",
            ResourceType::Media => "Media",
            ResourceType::Font => "Font",
            ResourceType::Script => "Script",
            ResourceType::TextTrack => "TextTrack",
            ResourceType::XHR => "XHR",
            ResourceType::Fetch => "Fetch",
            ResourceType::Prefetch => "Prefetch",
            ResourceType::EventSource => "EventSource",
            ResourceType::WebSocket => "WebSocket",
            ResourceType::Manifest => "Manifest",
            ResourceType::SignedExchange => "SignedExchange",
            ResourceType::Ping => "Ping",
            ResourceType::CSPViolationReport => "CSPViolationReport",
            ResourceType::Preflight => "Preflight",
            ResourceType::Other => "Other",
        }
    }

    /// Parse a protocol label, falling back to `Other` for unknown labels
    pub fn from_protocol(label: &str) -> Self {
        match label {
            "Document" => ResourceType::Document,
            "Stylesheet" => ResourceType::Stylesheet,
            "Image" => ResourceType::Image,
            "Media" => ResourceType::Media,
            "Font" => ResourceType::Font,
            "Script" => ResourceType::Script,
            "TextTrack" => ResourceType::TextTrack,
            "XHR" => ResourceType::XHR,
            "Fetch" => ResourceType::Fetch,
            "Prefetch" => ResourceType::Prefetch,
            "EventSource" => ResourceType::EventSource,
            "WebSocket" => ResourceType::WebSocket,
            "Manifest" => ResourceType::Manifest,
            "SignedExchange" => ResourceType::SignedExchange,
            "Ping" => ResourceType::Ping,
            "CSPViolationReport" => ResourceType::CSPViolationReport,
            "Preflight" => ResourceType::Preflight,
            _ => ResourceType::Other,
        }
    }
}

impl From<String> for ResourceType {
    fn from(label: String) -> Self {
        ResourceType::from_protocol(&label)
    }
}

impl From<ResourceType> for String {
    fn from(resource_type: ResourceType) -> Self {
        resource_type.as_str().to_string()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request portion of `Network.requestWillBeSent`
///
/// Only the fields needed to rebuild request records are kept; everything
/// else in the payload is ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    /// Request URL
    pub url: String,
    /// HTTP method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// Response payload carried by `Network.responseReceived` and redirects
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    /// Response URL
    pub url: String,
    /// HTTP status code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u32>,
    /// MIME type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Protocol used (`h2`, `http/1.1`, `data`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Bytes received so far for this response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoded_data_length: Option<f64>,
    /// Whether response came from disk cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_disk_cache: Option<bool>,
}

/// `Network.requestWillBeSent` parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestWillBeSentEvent {
    pub request_id: RequestId,
    pub request: EventRequest,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<ResourceType>,
    /// Present when this request is the next hop of a redirect chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_response: Option<EventResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

/// `Network.responseReceived` parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseReceivedEvent {
    pub request_id: RequestId,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<ResourceType>,
    pub response: EventResponse,
}

/// `Network.dataReceived` parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataReceivedEvent {
    pub request_id: RequestId,
    /// Decoded bytes in this chunk
    pub data_length: u64,
    /// Wire bytes in this chunk
    #[serde(default)]
    pub encoded_data_length: f64,
}

/// `Network.loadingFinished` parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFinishedEvent {
    pub request_id: RequestId,
    /// Total wire bytes for the request
    pub encoded_data_length: f64,
}

/// `Network.loadingFailed` parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFailedEvent {
    pub request_id: RequestId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canceled: Option<bool>,
}

/// `Network.requestServedFromCache` parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestServedFromCacheEvent {
    pub request_id: RequestId,
}
