//! First-party host resolution
//!
//! Host patterns are either exact hostnames (`example.com`) or wildcard
//! suffixes (`*.example.com`).

use crate::budget::Budget;
use crate::entity::{root_domain, EntityClassification};
use crate::types::PageUrl;
use tracing::debug;
use url::Url;

const WILDCARD_PREFIX: &str = "*.";

/// Host patterns that count as first party for this page
///
/// Explicit budget hostnames win, then the first-party entity's domains, then
/// the root domain of the displayed URL.
pub fn first_party_hosts(
    budget: Option<&Budget>,
    classification: Option<&EntityClassification>,
    page_url: &PageUrl,
) -> Vec<String> {
    if let Some(hostnames) = budget.and_then(Budget::first_party_hostnames) {
        debug!("Using {} first-party hostnames from budget", hostnames.len());
        return hostnames.to_vec();
    }

    if let Some(first_party) = classification.and_then(|c| c.first_party.as_ref()) {
        debug!("Using domains of first-party entity {}", first_party.name);
        return first_party
            .domains
            .iter()
            .map(|domain| format!("{}{}", WILDCARD_PREFIX, domain))
            .collect();
    }

    root_domain(&page_url.final_displayed_url)
        .map(|root| vec![format!("{}{}", WILDCARD_PREFIX, root)])
        .unwrap_or_default()
}

/// Whether the host of `request_url` matches any of `host_patterns`
pub fn is_first_party(request_url: &str, host_patterns: &[String]) -> bool {
    let Some(hostname) = hostname(request_url) else {
        return false;
    };
    host_patterns
        .iter()
        .any(|pattern| host_matches(&hostname, pattern))
}

fn hostname(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
}

/// Wildcard patterns are a plain suffix test on the hostname
fn host_matches(hostname: &str, pattern: &str) -> bool {
    match pattern.strip_prefix(WILDCARD_PREFIX) {
        Some(suffix) => hostname.ends_with(suffix),
        None => hostname == pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;

    fn patterns(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn test_budget_override_wins() {
        let budget = Budget::with_first_party_hostnames(["cdn.example.net", "*.example.com"]);
        let classification =
            EntityClassification::with_first_party(Entity::new("Other", ["other.com"]));

        let hosts = first_party_hosts(
            Some(&budget),
            Some(&classification),
            &PageUrl::new("https://www.example.com/"),
        );
        assert_eq!(hosts, patterns(&["cdn.example.net", "*.example.com"]));
    }

    #[test]
    fn test_budget_without_hostnames_falls_through() {
        let budget = Budget::default().with_path("/");
        let classification = EntityClassification::with_first_party(Entity::new(
            "Example",
            ["example.com", "examplecdn.net"],
        ));

        let hosts = first_party_hosts(
            Some(&budget),
            Some(&classification),
            &PageUrl::new("https://www.example.com/"),
        );
        assert_eq!(hosts, patterns(&["*.example.com", "*.examplecdn.net"]));
    }

    #[test]
    fn test_root_domain_fallback_uses_displayed_url() {
        let page = PageUrl {
            requested_url: Some("https://start.example.org/".to_string()),
            main_document_url: Some("https://start.example.org/".to_string()),
            final_displayed_url: "https://www.landing.co.uk/#top".to_string(),
        };
        assert_eq!(
            first_party_hosts(None, None, &page),
            patterns(&["*.landing.co.uk"])
        );
    }

    #[test]
    fn test_no_host_gives_no_patterns() {
        let page = PageUrl::new("about:blank");
        assert!(first_party_hosts(None, None, &page).is_empty());
    }

    #[test]
    fn test_wildcard_match() {
        let hosts = patterns(&["*.example.com"]);
        assert!(is_first_party("https://cdn.example.com/a.js", &hosts));
        assert!(is_first_party("https://example.com/", &hosts));
        assert!(!is_first_party("https://other.com/b.js", &hosts));
    }

    #[test]
    fn test_wildcard_is_a_plain_suffix() {
        let hosts = patterns(&["*.example.com"]);
        assert!(is_first_party("https://badexample.com/", &hosts));
    }

    #[test]
    fn test_exact_match() {
        let hosts = patterns(&["example.com"]);
        assert!(is_first_party("https://example.com:8443/x", &hosts));
        assert!(!is_first_party("https://www.example.com/x", &hosts));
    }

    #[test]
    fn test_any_pattern_matches() {
        let hosts = patterns(&["static.foo.com", "*.bar.com"]);
        assert!(is_first_party("https://static.foo.com/", &hosts));
        assert!(is_first_party("https://img.bar.com/", &hosts));
        assert!(!is_first_party("https://foo.com/", &hosts));
    }

    #[test]
    fn test_hostless_request_is_never_first_party() {
        let hosts = patterns(&["*."]);
        assert!(!is_first_party("data:text/plain,hello", &hosts));
        assert!(!is_first_party("garbage", &hosts));
        assert!(!is_first_party("https://x.com/", &[]));
    }
}
