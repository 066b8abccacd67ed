//! Maps protocol resource types onto summary buckets

use crate::types::BudgetResourceType;
use cdp_types::domains::network::ResourceType;
use network_records::NetworkRequestRecord;

/// Bucket a record is counted under
pub fn classify(record: &NetworkRequestRecord) -> BudgetResourceType {
    record
        .resource_type
        .map(budget_resource_type)
        .unwrap_or(BudgetResourceType::Other)
}

/// Bucket for a protocol resource type
///
/// Lists every variant; a new protocol type has to be mapped here.
pub fn budget_resource_type(resource_type: ResourceType) -> BudgetResourceType {
    match resource_type {
        ResourceType::Stylesheet => BudgetResourceType::Stylesheet,
        ResourceType::Image => BudgetResourceType::Image,
        ResourceType::Media => BudgetResourceType::Media,
        ResourceType::Font => BudgetResourceType::Font,
        ResourceType::Script => BudgetResourceType::Script,
        ResourceType::Document => BudgetResourceType::Document,
        ResourceType::TextTrack
        | ResourceType::XHR
        | ResourceType::Fetch
        | ResourceType::Prefetch
        | ResourceType::EventSource
        | ResourceType::WebSocket
        | ResourceType::Manifest
        | ResourceType::SignedExchange
        | ResourceType::Ping
        | ResourceType::CSPViolationReport
        | ResourceType::Preflight
        | ResourceType::Other => BudgetResourceType::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_mappings() {
        let cases = [
            (ResourceType::Stylesheet, BudgetResourceType::Stylesheet),
            (ResourceType::Image, BudgetResourceType::Image),
            (ResourceType::Media, BudgetResourceType::Media),
            (ResourceType::Font, BudgetResourceType::Font),
            (ResourceType::Script, BudgetResourceType::Script),
            (ResourceType::Document, BudgetResourceType::Document),
        ];
        for (resource_type, expected) in cases {
            assert_eq!(budget_resource_type(resource_type), expected);
        }
    }

    #[test]
    fn test_everything_else_is_other() {
        for resource_type in [
            ResourceType::XHR,
            ResourceType::Fetch,
            ResourceType::WebSocket,
            ResourceType::Manifest,
            ResourceType::Other,
        ] {
            assert_eq!(budget_resource_type(resource_type), BudgetResourceType::Other);
        }
    }

    #[test]
    fn test_missing_type_is_other() {
        let record = NetworkRequestRecord::new("1", "https://example.com/favicon.ico");
        assert_eq!(classify(&record), BudgetResourceType::Other);
    }

    #[test]
    fn test_unknown_protocol_label_is_other() {
        let record = NetworkRequestRecord::new("1", "https://example.com/x")
            .with_resource_type(ResourceType::from_protocol("Unknown"));
        assert_eq!(classify(&record), BudgetResourceType::Other);
    }
}
