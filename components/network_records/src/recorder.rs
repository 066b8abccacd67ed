//! Rebuilds request records from `Network` domain events
//!
//! The recorder follows each request through its lifecycle events and keeps
//! the records in the order their first `requestWillBeSent` was observed.
//! Redirect hops become records of their own.

use crate::error::{RecordParsingError, Result};
use crate::record::NetworkRequestRecord;
use cdp_types::domains::network::{
    self, DataReceivedEvent, EventResponse, LoadingFailedEvent, LoadingFinishedEvent,
    RequestServedFromCacheEvent, RequestWillBeSentEvent, ResponseReceivedEvent,
};
use cdp_types::{CdpEvent, DevtoolsLog};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Suffix appended to the request id of a redirected hop, once per hop
/// already in the chain (`1:redirect`, `1:redirect:redirect`, ...)
pub const REDIRECT_SUFFIX: &str = ":redirect";

/// Incremental builder of [`NetworkRequestRecord`]s
#[derive(Debug, Default)]
pub struct NetworkRecorder {
    /// Records in creation order
    records: Vec<NetworkRequestRecord>,
    /// Live request id → position in `records`
    index: HashMap<String, usize>,
    /// Request id → redirect hops recorded so far
    redirects: HashMap<String, usize>,
}

impl NetworkRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild every request record contained in `log`
    pub fn records_from_log(log: &DevtoolsLog) -> Result<Vec<NetworkRequestRecord>> {
        let mut recorder = Self::new();
        for (index, event) in log.events().iter().enumerate() {
            recorder.record_event(index, event)?;
        }
        let records = recorder.finish();
        debug!(
            "Rebuilt {} network records from {} events",
            records.len(),
            log.len()
        );
        Ok(records)
    }

    /// Rebuild the records of a serialized DevTools log
    pub fn records_from_json(json: &str) -> Result<Vec<NetworkRequestRecord>> {
        let log = DevtoolsLog::from_json(json)?;
        Self::records_from_log(&log)
    }

    /// Feed one event; `index` is its position in the log, used for error reporting
    pub fn record_event(&mut self, index: usize, event: &CdpEvent) -> Result<()> {
        match event.method.as_str() {
            network::REQUEST_WILL_BE_SENT => self.on_request_will_be_sent(parse(index, event)?),
            network::RESPONSE_RECEIVED => self.on_response_received(parse(index, event)?),
            network::DATA_RECEIVED => self.on_data_received(parse(index, event)?),
            network::LOADING_FINISHED => self.on_loading_finished(parse(index, event)?),
            network::LOADING_FAILED => self.on_loading_failed(parse(index, event)?),
            network::REQUEST_SERVED_FROM_CACHE => {
                self.on_served_from_cache(parse(index, event)?)
            }
            _ => {}
        }
        Ok(())
    }

    /// Number of records created so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the recorder and return the records in creation order
    pub fn finish(self) -> Vec<NetworkRequestRecord> {
        self.records
    }

    fn on_request_will_be_sent(&mut self, event: RequestWillBeSentEvent) {
        let request_id = event.request_id.0;

        if let Some(&position) = self.index.get(&request_id) {
            match event.redirect_response {
                Some(redirect) => {
                    let hop = &mut self.records[position];
                    apply_response(hop, &redirect);
                    if let Some(len) = redirect.encoded_data_length {
                        hop.transfer_size = wire_bytes(len);
                    }
                    hop.finished = true;
                    let depth = self.redirects.entry(request_id.clone()).or_insert(0);
                    *depth += 1;
                    hop.request_id =
                        format!("{}{}", request_id, REDIRECT_SUFFIX.repeat(*depth));
                    debug!("Request {} redirected to {}", request_id, event.request.url);
                }
                None => {
                    warn!("Duplicate requestWillBeSent for request: {}", request_id);
                    return;
                }
            }
        } else if event.redirect_response.is_some() {
            warn!(
                "Redirect response for unknown request: {}, starting a new record",
                request_id
            );
        }

        let mut record = NetworkRequestRecord::new(request_id.clone(), event.request.url);
        record.resource_type = event.resource_type;
        self.index.insert(request_id, self.records.len());
        self.records.push(record);
    }

    fn on_response_received(&mut self, event: ResponseReceivedEvent) {
        let Some(record) = self.live_record(&event.request_id.0) else {
            return;
        };
        if event.resource_type.is_some() {
            record.resource_type = event.resource_type;
        }
        apply_response(record, &event.response);
        if let Some(len) = event.response.encoded_data_length {
            record.transfer_size = wire_bytes(len);
        }
    }

    fn on_data_received(&mut self, event: DataReceivedEvent) {
        let Some(record) = self.live_record(&event.request_id.0) else {
            return;
        };
        record.resource_size = record.resource_size.saturating_add(event.data_length);
        record.transfer_size = record
            .transfer_size
            .saturating_add(wire_bytes(event.encoded_data_length));
    }

    fn on_loading_finished(&mut self, event: LoadingFinishedEvent) {
        let Some(record) = self.live_record(&event.request_id.0) else {
            return;
        };
        record.transfer_size = wire_bytes(event.encoded_data_length);
        record.finished = true;
    }

    fn on_loading_failed(&mut self, event: LoadingFailedEvent) {
        let Some(record) = self.live_record(&event.request_id.0) else {
            return;
        };
        debug!(
            "Request {} failed: {}",
            record.request_id,
            event.error_text.as_deref().unwrap_or("unknown error")
        );
        record.failed = true;
        record.finished = true;
    }

    fn on_served_from_cache(&mut self, event: RequestServedFromCacheEvent) {
        if let Some(record) = self.live_record(&event.request_id.0) {
            record.from_cache = true;
        }
    }

    fn live_record(&mut self, request_id: &str) -> Option<&mut NetworkRequestRecord> {
        match self.index.get(request_id) {
            Some(&position) => self.records.get_mut(position),
            None => {
                warn!("Event for unknown request: {}", request_id);
                None
            }
        }
    }
}

fn parse<T: DeserializeOwned>(index: usize, event: &CdpEvent) -> Result<T> {
    serde_json::from_value(event.params.clone()).map_err(|source| {
        RecordParsingError::InvalidEvent {
            method: event.method.clone(),
            index,
            source,
        }
    })
}

fn apply_response(record: &mut NetworkRequestRecord, response: &EventResponse) {
    if response.status.is_some() {
        record.status_code = response.status;
    }
    if response.mime_type.is_some() {
        record.mime_type = response.mime_type.clone();
    }
    if response.protocol.is_some() {
        record.protocol = response.protocol.clone();
    }
    if response.from_disk_cache == Some(true) {
        record.from_cache = true;
    }
}

/// Protocol lengths are doubles and may be -1 when unknown
fn wire_bytes(len: f64) -> u64 {
    if len.is_finite() && len > 0.0 {
        len as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdp_types::domains::network::ResourceType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn event(method: &str, params: serde_json::Value) -> CdpEvent {
        CdpEvent::new(method, params)
    }

    #[test]
    fn test_full_lifecycle() {
        let log = DevtoolsLog::new(vec![
            event(
                network::REQUEST_WILL_BE_SENT,
                json!({"requestId": "1", "request": {"url": "https://example.com/app.js"}, "type": "Script"}),
            ),
            event(
                network::RESPONSE_RECEIVED,
                json!({"requestId": "1", "type": "Script", "response": {
                    "url": "https://example.com/app.js", "status": 200,
                    "mimeType": "text/javascript", "protocol": "h2", "encodedDataLength": 150
                }}),
            ),
            event(
                network::DATA_RECEIVED,
                json!({"requestId": "1", "dataLength": 4000, "encodedDataLength": 900}),
            ),
            event(
                network::LOADING_FINISHED,
                json!({"requestId": "1", "encodedDataLength": 1200}),
            ),
        ]);

        let records = NetworkRecorder::records_from_log(&log).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.resource_type, Some(ResourceType::Script));
        assert_eq!(record.resource_size, 4000);
        assert_eq!(record.transfer_size, 1200);
        assert_eq!(record.protocol.as_deref(), Some("h2"));
        assert_eq!(record.status_code, Some(200));
        assert!(record.finished);
    }

    #[test]
    fn test_redirect_creates_two_records() {
        let log = DevtoolsLog::new(vec![
            event(
                network::REQUEST_WILL_BE_SENT,
                json!({"requestId": "1", "request": {"url": "http://example.com/"}, "type": "Document"}),
            ),
            event(
                network::REQUEST_WILL_BE_SENT,
                json!({
                    "requestId": "1",
                    "request": {"url": "https://example.com/"},
                    "type": "Document",
                    "redirectResponse": {"url": "http://example.com/", "status": 301, "encodedDataLength": 210}
                }),
            ),
            event(
                network::LOADING_FINISHED,
                json!({"requestId": "1", "encodedDataLength": 5000}),
            ),
        ]);

        let records = NetworkRecorder::records_from_log(&log).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].request_id, "1:redirect");
        assert_eq!(records[0].status_code, Some(301));
        assert_eq!(records[0].transfer_size, 210);
        assert_eq!(records[1].request_id, "1");
        assert_eq!(records[1].url, "https://example.com/");
        assert_eq!(records[1].transfer_size, 5000);
    }

    #[test]
    fn test_redirect_chain_ids_are_unique() {
        let hop = |from: &str, to: &str| {
            event(
                network::REQUEST_WILL_BE_SENT,
                json!({
                    "requestId": "7",
                    "request": {"url": to},
                    "redirectResponse": {"url": from, "status": 302}
                }),
            )
        };
        let log = DevtoolsLog::new(vec![
            event(
                network::REQUEST_WILL_BE_SENT,
                json!({"requestId": "7", "request": {"url": "http://a.test/"}}),
            ),
            hop("http://a.test/", "https://a.test/"),
            hop("https://a.test/", "https://www.a.test/"),
            hop("https://www.a.test/", "https://www.a.test/home"),
        ]);

        let records = NetworkRecorder::records_from_log(&log).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.request_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "7:redirect",
                "7:redirect:redirect",
                "7:redirect:redirect:redirect",
                "7",
            ]
        );
        assert_eq!(records[3].url, "https://www.a.test/home");
    }

    #[test]
    fn test_unknown_request_events_are_ignored() {
        let log = DevtoolsLog::new(vec![event(
            network::DATA_RECEIVED,
            json!({"requestId": "ghost", "dataLength": 10}),
        )]);

        let records = NetworkRecorder::records_from_log(&log).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_non_network_events_are_ignored() {
        let log = DevtoolsLog::new(vec![
            event("Page.loadEventFired", json!({"timestamp": 1.0})),
            event("Runtime.consoleAPICalled", json!("not an object")),
        ]);

        assert!(NetworkRecorder::records_from_log(&log).unwrap().is_empty());
    }

    #[test]
    fn test_missing_url_is_an_error() {
        let log = DevtoolsLog::new(vec![
            event("Page.frameNavigated", json!({})),
            event(
                network::REQUEST_WILL_BE_SENT,
                json!({"requestId": "1", "request": {}}),
            ),
        ]);

        let err = NetworkRecorder::records_from_log(&log).unwrap_err();
        match err {
            RecordParsingError::InvalidEvent { method, index, .. } => {
                assert_eq!(method, network::REQUEST_WILL_BE_SENT);
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_failed_and_cached_flags() {
        let mut recorder = NetworkRecorder::new();
        recorder
            .record_event(
                0,
                &event(
                    network::REQUEST_WILL_BE_SENT,
                    json!({"requestId": "a", "request": {"url": "https://example.com/x.png"}}),
                ),
            )
            .unwrap();
        recorder
            .record_event(
                1,
                &event(network::REQUEST_SERVED_FROM_CACHE, json!({"requestId": "a"})),
            )
            .unwrap();
        recorder
            .record_event(
                2,
                &event(
                    network::LOADING_FAILED,
                    json!({"requestId": "a", "errorText": "net::ERR_ABORTED"}),
                ),
            )
            .unwrap();

        assert_eq!(recorder.len(), 1);
        let records = recorder.finish();
        assert!(records[0].from_cache);
        assert!(records[0].failed);
        assert!(records[0].resource_type.is_none());
    }

    #[test]
    fn test_negative_lengths_count_as_zero() {
        assert_eq!(wire_bytes(-1.0), 0);
        assert_eq!(wire_bytes(f64::NAN), 0);
        assert_eq!(wire_bytes(12.9), 12);
    }
}
