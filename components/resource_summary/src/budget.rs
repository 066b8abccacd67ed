//! Performance budgets
//!
//! A budget file is a JSON array of per-path budgets. The budget that applies
//! to a page is the last one whose `path` matches the page URL.

use crate::error::BudgetConfigError;
use crate::types::BudgetResourceType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Path used when a budget does not declare one
pub const DEFAULT_BUDGET_PATH: &str = "/";

/// Budget for a single page path pattern
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// Path pattern (`/`, `/blog*`, `/checkout$`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<BudgetOptions>,
    /// Size limits in kibibytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_sizes: Option<Vec<ResourceBudget>>,
    /// Request count limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_counts: Option<Vec<ResourceBudget>>,
    /// Timing limits in milliseconds (unitless for layout shift)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timings: Option<Vec<TimingBudget>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetOptions {
    /// Host patterns treated as first party, overriding inferred ownership
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_party_hostnames: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceBudget {
    pub resource_type: BudgetResourceType,
    pub budget: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingMetric {
    FirstContentfulPaint,
    Interactive,
    FirstMeaningfulPaint,
    MaxPotentialFid,
    TotalBlockingTime,
    SpeedIndex,
    LargestContentfulPaint,
    CumulativeLayoutShift,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBudget {
    pub metric: TimingMetric,
    pub budget: f64,
}

impl Budget {
    /// Budget that only overrides the first-party host patterns
    pub fn with_first_party_hostnames<I, S>(hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: Some(BudgetOptions {
                first_party_hostnames: Some(hostnames.into_iter().map(Into::into).collect()),
            }),
            ..Self::default()
        }
    }

    /// Set the path pattern
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Explicit first-party host patterns, if configured
    pub fn first_party_hostnames(&self) -> Option<&[String]> {
        self.options
            .as_ref()
            .and_then(|options| options.first_party_hostnames.as_deref())
    }

    /// Parse and validate a budget file
    pub fn parse_budgets(json: &str) -> Result<Vec<Budget>, BudgetConfigError> {
        let budgets: Vec<Budget> = serde_json::from_str(json)?;
        for budget in &budgets {
            budget.validate()?;
        }
        debug!("Parsed {} budgets", budgets.len());
        Ok(budgets)
    }

    /// Check paths, host patterns, budget values and duplicates
    pub fn validate(&self) -> Result<(), BudgetConfigError> {
        if let Some(path) = &self.path {
            validate_path(path)?;
        }
        if let Some(hostnames) = self.first_party_hostnames() {
            for hostname in hostnames {
                validate_hostname(hostname)?;
            }
        }
        if let Some(sizes) = &self.resource_sizes {
            validate_resource_budgets(sizes, "resourceSizes")?;
        }
        if let Some(counts) = &self.resource_counts {
            validate_resource_budgets(counts, "resourceCounts")?;
        }
        if let Some(timings) = &self.timings {
            let mut seen = HashSet::new();
            for timing in timings {
                let name = serde_json::to_value(timing.metric)?
                    .as_str()
                    .unwrap_or_default()
                    .to_string();
                validate_budget_value(&name, timing.budget)?;
                if !seen.insert(timing.metric) {
                    return Err(BudgetConfigError::DuplicateTimingMetric(name));
                }
            }
        }
        Ok(())
    }

    /// Last budget whose path matches `url`
    pub fn matching<'a>(budgets: &'a [Budget], url: &str) -> Option<&'a Budget> {
        budgets.iter().rev().find(|budget| {
            Self::url_matches_pattern(url, budget.path.as_deref().unwrap_or(DEFAULT_BUDGET_PATH))
        })
    }

    /// Whether the path and query of `url` match a budget path pattern
    ///
    /// Without special characters the pattern is a prefix. A trailing `$`
    /// demands an exact match. A `*` matches any run of characters.
    pub fn url_matches_pattern(url: &str, pattern: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let url_path = match parsed.query() {
            Some(query) if !query.is_empty() => format!("{}?{}", parsed.path(), query),
            _ => parsed.path().to_string(),
        };

        let (pattern, anchored) = match pattern.strip_suffix('$') {
            Some(stripped) => (stripped, true),
            None => (pattern, false),
        };

        match pattern.split_once('*') {
            None if anchored => url_path == pattern,
            None => url_path.starts_with(pattern),
            Some((before, after)) => {
                let Some(rest) = url_path.strip_prefix(before) else {
                    return false;
                };
                if anchored {
                    rest.ends_with(after)
                } else {
                    rest.contains(after)
                }
            }
        }
    }
}

fn validate_path(path: &str) -> Result<(), BudgetConfigError> {
    let invalid = |reason| BudgetConfigError::InvalidPath {
        path: path.to_string(),
        reason,
    };
    if !path.starts_with('/') {
        return Err(invalid("'Path' should start with '/'."));
    }
    if path.matches('*').count() > 1 {
        return Err(invalid("Path should only contain one '*'."));
    }
    if path.matches('$').count() > 1 {
        return Err(invalid("Path should only contain one '$' character."));
    }
    if path.contains('$') && !path.ends_with('$') {
        return Err(invalid("'$' character should only occur at end of path."));
    }
    Ok(())
}

fn validate_hostname(hostname: &str) -> Result<(), BudgetConfigError> {
    let invalid = || BudgetConfigError::InvalidHostname(hostname.to_string());
    if hostname.is_empty() || hostname.contains('/') || hostname.contains(':') {
        return Err(invalid());
    }
    if hostname.contains('*') && (!hostname.starts_with("*.") || hostname.rfind('*') != Some(0)) {
        return Err(invalid());
    }
    Ok(())
}

fn validate_resource_budgets(
    budgets: &[ResourceBudget],
    list: &'static str,
) -> Result<(), BudgetConfigError> {
    let mut seen = HashSet::new();
    for entry in budgets {
        validate_budget_value(entry.resource_type.as_str(), entry.budget)?;
        if !seen.insert(entry.resource_type) {
            return Err(BudgetConfigError::DuplicateResourceType {
                resource_type: entry.resource_type,
                list,
            });
        }
    }
    Ok(())
}

fn validate_budget_value(name: &str, value: f64) -> Result<(), BudgetConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(BudgetConfigError::InvalidBudgetValue {
            name: name.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_budget_file() {
        let budgets = Budget::parse_budgets(
            r#"[{
                "path": "/*",
                "options": {"firstPartyHostnames": ["*.example.com", "example.net"]},
                "resourceSizes": [{"resourceType": "script", "budget": 125}],
                "resourceCounts": [{"resourceType": "third-party", "budget": 10}],
                "timings": [{"metric": "interactive", "budget": 5000}]
            }]"#,
        )
        .unwrap();

        assert_eq!(budgets.len(), 1);
        let budget = &budgets[0];
        assert_eq!(budget.path.as_deref(), Some("/*"));
        assert_eq!(
            budget.first_party_hostnames(),
            Some(&["*.example.com".to_string(), "example.net".to_string()][..])
        );
        let counts = budget.resource_counts.as_ref().unwrap();
        assert_eq!(counts[0].resource_type, BudgetResourceType::ThirdParty);
        assert_eq!(
            budget.timings.as_ref().unwrap()[0].metric,
            TimingMetric::Interactive
        );
    }

    #[test]
    fn test_unknown_resource_type_rejected() {
        let result =
            Budget::parse_budgets(r#"[{"resourceSizes": [{"resourceType": "video", "budget": 1}]}]"#);
        assert!(matches!(result, Err(BudgetConfigError::Json(_))));
    }

    #[test]
    fn test_invalid_paths() {
        for path in ["cat", "/cat*dog*", "/cat$$", "/cat$/dog"] {
            let budget = Budget::default().with_path(path);
            assert!(
                matches!(budget.validate(), Err(BudgetConfigError::InvalidPath { .. })),
                "{path} should be rejected"
            );
        }
        assert!(Budget::default().with_path("/cat*dog$").validate().is_ok());
    }

    #[test]
    fn test_invalid_hostnames() {
        for hostname in ["", "example.com/", "example.com:8080", "cdn.*.com", "*example.com", "*.*.com"] {
            let budget = Budget::with_first_party_hostnames([hostname]);
            assert!(
                matches!(budget.validate(), Err(BudgetConfigError::InvalidHostname(_))),
                "{hostname:?} should be rejected"
            );
        }
        assert!(Budget::with_first_party_hostnames(["*.example.com", "example.com"])
            .validate()
            .is_ok());
    }

    #[test]
    fn test_duplicates_and_negative_values() {
        let duplicate = Budget::parse_budgets(
            r#"[{"resourceCounts": [
                {"resourceType": "font", "budget": 1},
                {"resourceType": "font", "budget": 2}
            ]}]"#,
        );
        assert!(matches!(
            duplicate,
            Err(BudgetConfigError::DuplicateResourceType { list: "resourceCounts", .. })
        ));

        let negative =
            Budget::parse_budgets(r#"[{"resourceSizes": [{"resourceType": "image", "budget": -5}]}]"#);
        assert!(matches!(
            negative,
            Err(BudgetConfigError::InvalidBudgetValue { .. })
        ));

        let duplicate_metric = Budget::parse_budgets(
            r#"[{"timings": [
                {"metric": "speed-index", "budget": 1},
                {"metric": "speed-index", "budget": 2}
            ]}]"#,
        );
        match duplicate_metric {
            Err(BudgetConfigError::DuplicateTimingMetric(name)) => assert_eq!(name, "speed-index"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_url_matches_plain_prefix() {
        assert!(Budget::url_matches_pattern("https://example.com/", "/"));
        assert!(Budget::url_matches_pattern("https://example.com/cat/dog", "/cat"));
        assert!(!Budget::url_matches_pattern("https://example.com/dog", "/cat"));
    }

    #[test]
    fn test_url_matches_exact() {
        assert!(Budget::url_matches_pattern("https://example.com/cat", "/cat$"));
        assert!(!Budget::url_matches_pattern("https://example.com/cats", "/cat$"));
    }

    #[test]
    fn test_url_matches_wildcard() {
        assert!(Budget::url_matches_pattern("https://example.com/cat/x/dog/y", "/cat*dog"));
        assert!(!Budget::url_matches_pattern("https://example.com/cat/x", "/cat*dog"));
        assert!(Budget::url_matches_pattern("https://example.com/cat/x/dog", "/cat*dog$"));
        assert!(!Budget::url_matches_pattern("https://example.com/cat/x/dog/y", "/cat*dog$"));
    }

    #[test]
    fn test_url_matches_query() {
        assert!(Budget::url_matches_pattern("https://example.com/search?q=a", "/search?q=a$"));
        assert!(Budget::url_matches_pattern("https://example.com/search?q=a", "/*?q=a"));
    }

    #[test]
    fn test_url_matches_empty_query() {
        assert!(Budget::url_matches_pattern("https://example.com/a?", "/a$"));
        assert!(!Budget::url_matches_pattern("https://example.com/a?", "/a?$"));

        let budgets = vec![
            Budget::with_first_party_hostnames(["a.com"]),
            Budget::with_first_party_hostnames(["b.com"]).with_path("/a$"),
        ];
        let applied = Budget::matching(&budgets, "https://example.com/a?").unwrap();
        assert_eq!(applied.first_party_hostnames(), Some(&["b.com".to_string()][..]));
    }

    #[test]
    fn test_matching_prefers_last_budget() {
        let budgets = vec![
            Budget::with_first_party_hostnames(["a.com"]),
            Budget::with_first_party_hostnames(["b.com"]).with_path("/blog"),
            Budget::with_first_party_hostnames(["c.com"]).with_path("/shop"),
        ];

        let blog = Budget::matching(&budgets, "https://example.com/blog/post").unwrap();
        assert_eq!(blog.first_party_hostnames(), Some(&["b.com".to_string()][..]));

        let home = Budget::matching(&budgets, "https://example.com/").unwrap();
        assert_eq!(home.first_party_hostnames(), Some(&["a.com".to_string()][..]));

        assert!(Budget::matching(&budgets[1..], "https://example.com/").is_none());
        assert!(Budget::matching(&[], "https://example.com/").is_none());
    }
}
