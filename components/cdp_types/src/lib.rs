// CDP protocol events and DevTools logs
//
// Shared by the network record and resource summary components.

pub mod domains;

use serde::{Deserialize, Serialize};

/// CDP Event message
/// Represents an unsolicited event from the CDP server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CdpEvent {
    /// Event name in format "Domain.event"
    pub method: String,
    /// Event parameters
    #[serde(default)]
    pub params: serde_json::Value,
}

impl CdpEvent {
    /// Create a new event
    pub fn new(method: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    /// Domain part of the method name ("Network" for "Network.dataReceived")
    pub fn domain(&self) -> &str {
        self.method
            .split_once('.')
            .map(|(domain, _)| domain)
            .unwrap_or(&self.method)
    }
}

/// Ordered list of protocol events captured while a page loaded
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct DevtoolsLog(pub Vec<CdpEvent>);

impl DevtoolsLog {
    /// Create a log from captured events
    pub fn new(events: Vec<CdpEvent>) -> Self {
        Self(events)
    }

    /// Parse a log from its JSON array form
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Events in capture order
    pub fn events(&self) -> &[CdpEvent] {
        &self.0
    }

    /// Append an event
    pub fn push(&mut self, event: CdpEvent) {
        self.0.push(event);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<CdpEvent>> for DevtoolsLog {
    fn from(events: Vec<CdpEvent>) -> Self {
        Self(events)
    }
}
