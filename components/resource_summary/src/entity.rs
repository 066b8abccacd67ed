//! Entity classification
//!
//! Groups request hosts into the organizations that own them and identifies
//! which organization owns the page itself.

use crate::error::EntityClassificationError;
use crate::types::PageUrl;
use async_trait::async_trait;
use network_records::NetworkRequestRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use url::{Host, Url};

/// Second-level labels that commonly sit under a country code top-level domain
const GENERIC_SECOND_LEVEL_LABELS: &[&str] = &[
    "ac", "bel", "blog", "ca", "co", "com", "edu", "go", "gob", "gouv", "gov", "in", "jus", "kiev",
    "mil", "ne", "net", "nic", "on", "or", "org", "qc", "spb", "web", "wi",
];

/// Registrable part of a URL's host (`www.example.co.uk` → `example.co.uk`)
///
/// IP addresses and single-label hosts are returned unchanged. Returns `None`
/// when the URL does not parse or has no host.
pub fn root_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    match parsed.host()? {
        Host::Domain(domain) => Some(root_of_hostname(domain)),
        Host::Ipv4(_) | Host::Ipv6(_) => parsed.host_str().map(str::to_string),
    }
}

fn root_of_hostname(hostname: &str) -> String {
    let hostname = hostname.trim_end_matches('.');
    let labels: Vec<&str> = hostname.split('.').collect();
    if labels.len() <= 2 {
        return hostname.to_string();
    }
    let second_level = labels[labels.len() - 2];
    let keep = if GENERIC_SECOND_LEVEL_LABELS.contains(&second_level) {
        3
    } else {
        2
    };
    labels[labels.len() - keep..].join(".")
}

/// An organization and the domains it owns
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub domains: Vec<String>,
}

impl Entity {
    pub fn new<I, S>(name: impl Into<String>, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            domains: domains.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `hostname` is one of the entity's domains or a subdomain of one
    pub fn owns_hostname(&self, hostname: &str) -> bool {
        self.domains.iter().any(|domain| {
            hostname == domain
                || hostname
                    .strip_suffix(domain.as_str())
                    .map(|prefix| prefix.ends_with('.'))
                    .unwrap_or(false)
        })
    }
}

/// Ownership of every host seen during a page load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityClassification {
    /// Entity owning the main document, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_party: Option<Entity>,
    /// Entities seen, keyed by name
    #[serde(default)]
    pub entities: BTreeMap<String, Entity>,
    /// Request URL → owning entity name
    #[serde(default)]
    pub url_entities: BTreeMap<String, String>,
}

impl EntityClassification {
    /// Classification that only names the first-party entity
    pub fn with_first_party(entity: Entity) -> Self {
        let mut entities = BTreeMap::new();
        entities.insert(entity.name.clone(), entity.clone());
        Self {
            first_party: Some(entity),
            entities,
            url_entities: BTreeMap::new(),
        }
    }

    /// Entity that owns `url`, if it was classified
    pub fn entity_for_url(&self, url: &str) -> Option<&Entity> {
        self.url_entities
            .get(url)
            .and_then(|name| self.entities.get(name))
    }

    /// Whether `url` belongs to the first-party entity
    pub fn is_first_party(&self, url: &str) -> bool {
        match (&self.first_party, self.entity_for_url(url)) {
            (Some(first_party), Some(entity)) => first_party.name == entity.name,
            _ => false,
        }
    }
}

/// Source of the entity classification for a page load
#[async_trait]
pub trait EntityClassificationProvider: Send + Sync {
    async fn request(
        &self,
        page_url: &PageUrl,
        records: &[NetworkRequestRecord],
    ) -> Result<EntityClassification, EntityClassificationError>;
}

/// Classifier backed by a list of known entities
///
/// Hosts no known entity owns are attributed to a synthesized entity named
/// after their root domain.
#[derive(Debug, Clone, Default)]
pub struct EntityClassifier {
    known: Vec<Entity>,
}

impl EntityClassifier {
    /// Classifier with no known entities; every host maps to its root domain
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier with a list of known entities
    pub fn with_entities(known: Vec<Entity>) -> Result<Self, EntityClassificationError> {
        for entity in &known {
            if entity.domains.is_empty() {
                return Err(EntityClassificationError::EmptyEntity(entity.name.clone()));
            }
            if let Some(domain) = entity
                .domains
                .iter()
                .find(|domain| domain.is_empty() || domain.contains(['/', ':', '*']))
            {
                return Err(EntityClassificationError::InvalidDomain {
                    entity: entity.name.clone(),
                    domain: domain.clone(),
                });
            }
        }
        Ok(Self { known })
    }

    /// Entity owning `url`, synthesizing one for unknown hosts
    pub fn entity_for_url(&self, url: &str) -> Option<Entity> {
        let parsed = Url::parse(url).ok()?;
        let hostname = parsed.host_str()?;
        if let Some(entity) = self.known.iter().find(|entity| entity.owns_hostname(hostname)) {
            return Some(entity.clone());
        }
        let root = root_domain(url)?;
        Some(Entity::new(root.clone(), [root]))
    }

    /// Classify the page and every record URL
    pub fn classify(
        &self,
        page_url: &PageUrl,
        records: &[NetworkRequestRecord],
    ) -> EntityClassification {
        let mut classification = EntityClassification::default();

        for record in records {
            if let Some(entity) = self.entity_for_url(&record.url) {
                classification
                    .url_entities
                    .insert(record.url.clone(), entity.name.clone());
                classification
                    .entities
                    .entry(entity.name.clone())
                    .or_insert(entity);
            }
        }

        let main_document = page_url
            .main_document_url
            .as_deref()
            .unwrap_or(&page_url.final_displayed_url);
        classification.first_party = self.entity_for_url(main_document);

        debug!(
            "Classified {} urls into {} entities, first party: {:?}",
            classification.url_entities.len(),
            classification.entities.len(),
            classification.first_party.as_ref().map(|entity| &entity.name)
        );
        classification
    }
}

#[async_trait]
impl EntityClassificationProvider for EntityClassifier {
    async fn request(
        &self,
        page_url: &PageUrl,
        records: &[NetworkRequestRecord],
    ) -> Result<EntityClassification, EntityClassificationError> {
        Ok(self.classify(page_url, records))
    }
}
