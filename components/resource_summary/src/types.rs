//! Summary value types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Bucket a request is counted under
///
/// `Total` and `ThirdParty` are aggregate buckets; a single request is never
/// classified as either of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetResourceType {
    Stylesheet,
    Image,
    Media,
    Font,
    Script,
    Document,
    Other,
    Total,
    ThirdParty,
}

impl BudgetResourceType {
    /// Every bucket, in summary order
    pub const ALL: [BudgetResourceType; 9] = [
        BudgetResourceType::Stylesheet,
        BudgetResourceType::Image,
        BudgetResourceType::Media,
        BudgetResourceType::Font,
        BudgetResourceType::Script,
        BudgetResourceType::Document,
        BudgetResourceType::Other,
        BudgetResourceType::Total,
        BudgetResourceType::ThirdParty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetResourceType::Stylesheet => "stylesheet",
            BudgetResourceType::Image => "image",
            BudgetResourceType::Media => "media",
            BudgetResourceType::Font => "font",
            BudgetResourceType::Script => "script",
            BudgetResourceType::Document => "document",
            BudgetResourceType::Other => "other",
            BudgetResourceType::Total => "total",
            BudgetResourceType::ThirdParty => "third-party",
        }
    }

    /// Whether this is one of the aggregate buckets
    pub fn is_aggregate(&self) -> bool {
        matches!(self, BudgetResourceType::Total | BudgetResourceType::ThirdParty)
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for BudgetResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count and byte totals for one bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    pub count: u64,
    pub resource_size: u64,
    pub transfer_size: u64,
}

impl ResourceEntry {
    /// Count one request of the given sizes
    pub fn add_request(&mut self, resource_size: u64, transfer_size: u64) {
        self.count = self.count.saturating_add(1);
        self.resource_size = self.resource_size.saturating_add(resource_size);
        self.transfer_size = self.transfer_size.saturating_add(transfer_size);
    }

    /// Field-wise sum
    pub fn merge(&mut self, other: &ResourceEntry) {
        self.count = self.count.saturating_add(other.count);
        self.resource_size = self.resource_size.saturating_add(other.resource_size);
        self.transfer_size = self.transfer_size.saturating_add(other.transfer_size);
    }
}

/// Per-bucket totals for one page load
///
/// Every bucket is always present; buckets with no requests hold zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<BudgetResourceType, ResourceEntry>",
    into = "BTreeMap<BudgetResourceType, ResourceEntry>"
)]
pub struct ResourceSummary {
    entries: [ResourceEntry; 9],
}

impl ResourceSummary {
    /// Summary with every bucket at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, resource_type: BudgetResourceType) -> &ResourceEntry {
        &self.entries[resource_type.slot()]
    }

    pub fn get_mut(&mut self, resource_type: BudgetResourceType) -> &mut ResourceEntry {
        &mut self.entries[resource_type.slot()]
    }

    /// Buckets paired with their entries, in summary order
    pub fn iter(&self) -> impl Iterator<Item = (BudgetResourceType, &ResourceEntry)> {
        BudgetResourceType::ALL
            .iter()
            .map(move |resource_type| (*resource_type, self.get(*resource_type)))
    }

    /// Add `other` into this summary bucket by bucket
    pub fn merge(&mut self, other: &ResourceSummary) {
        for (mine, theirs) in self.entries.iter_mut().zip(other.entries.iter()) {
            mine.merge(theirs);
        }
    }
}

impl Index<BudgetResourceType> for ResourceSummary {
    type Output = ResourceEntry;

    fn index(&self, resource_type: BudgetResourceType) -> &ResourceEntry {
        self.get(resource_type)
    }
}

impl IndexMut<BudgetResourceType> for ResourceSummary {
    fn index_mut(&mut self, resource_type: BudgetResourceType) -> &mut ResourceEntry {
        self.get_mut(resource_type)
    }
}

impl From<BTreeMap<BudgetResourceType, ResourceEntry>> for ResourceSummary {
    fn from(map: BTreeMap<BudgetResourceType, ResourceEntry>) -> Self {
        let mut summary = ResourceSummary::new();
        for (resource_type, entry) in map {
            summary[resource_type] = entry;
        }
        summary
    }
}

impl From<ResourceSummary> for BTreeMap<BudgetResourceType, ResourceEntry> {
    fn from(summary: ResourceSummary) -> Self {
        summary
            .iter()
            .map(|(resource_type, entry)| (resource_type, *entry))
            .collect()
    }
}

/// A `<link>` element found in the page
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl LinkElement {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: Some(rel.into()),
            href: Some(href.into()),
        }
    }
}

/// The URLs that describe where the page was loaded from
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageUrl {
    /// URL originally requested, before redirects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_url: Option<String>,
    /// URL of the document that was finally loaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_document_url: Option<String>,
    /// URL shown in the address bar once loading settled
    pub final_displayed_url: String,
}

impl PageUrl {
    /// Page whose requested, main document and displayed URLs are all `url`
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            requested_url: Some(url.clone()),
            main_document_url: Some(url.clone()),
            final_displayed_url: url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_new_summary_has_every_bucket() {
        let summary = ResourceSummary::new();
        assert_eq!(summary.iter().count(), 9);
        for (_, entry) in summary.iter() {
            assert_eq!(*entry, ResourceEntry::default());
        }
    }

    #[test]
    fn test_summary_serializes_all_keys() {
        let mut summary = ResourceSummary::new();
        summary[BudgetResourceType::Script].add_request(100, 40);

        let json = serde_json::to_value(summary).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 9);
        assert_eq!(
            json["script"],
            json!({"count": 1, "resourceSize": 100, "transferSize": 40})
        );
        assert_eq!(
            json["third-party"],
            json!({"count": 0, "resourceSize": 0, "transferSize": 0})
        );
    }

    #[test]
    fn test_deserialize_fills_missing_buckets() {
        let summary: ResourceSummary = serde_json::from_value(json!({
            "image": {"count": 2, "resourceSize": 10, "transferSize": 5}
        }))
        .unwrap();

        assert_eq!(summary[BudgetResourceType::Image].count, 2);
        assert_eq!(summary[BudgetResourceType::Font], ResourceEntry::default());
    }

    #[test]
    fn test_merge_sums_fields() {
        let mut left = ResourceSummary::new();
        left[BudgetResourceType::Font].add_request(10, 3);
        let mut right = ResourceSummary::new();
        right[BudgetResourceType::Font].add_request(5, 2);
        right[BudgetResourceType::Total].add_request(5, 2);

        left.merge(&right);
        assert_eq!(
            left[BudgetResourceType::Font],
            ResourceEntry {
                count: 2,
                resource_size: 15,
                transfer_size: 5
            }
        );
        assert_eq!(left[BudgetResourceType::Total].count, 1);
    }

    #[test]
    fn test_resource_type_names() {
        assert_eq!(
            serde_json::to_string(&BudgetResourceType::ThirdParty).unwrap(),
            "\"third-party\""
        );
        assert_eq!(BudgetResourceType::Stylesheet.to_string(), "stylesheet");
        assert!(BudgetResourceType::Total.is_aggregate());
        assert!(!BudgetResourceType::Other.is_aggregate());
    }

    #[test]
    fn test_sizes_saturate() {
        let mut entry = ResourceEntry {
            count: 0,
            resource_size: u64::MAX,
            transfer_size: 0,
        };
        entry.add_request(10, 1);
        assert_eq!(entry.resource_size, u64::MAX);
        assert_eq!(entry.transfer_size, 1);
    }
}
