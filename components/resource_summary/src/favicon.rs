//! Favicon candidates
//!
//! The browser may try several favicon URLs and only some of them succeed,
//! so every candidate is excluded from the summary to keep it stable from run
//! to run.

use crate::types::LinkElement;
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Path browsers probe when the page declares no icon
pub const DEFAULT_FAVICON_PATH: &str = "/favicon.ico";

const ICON_RELS: [&str; 2] = ["icon", "shortcut icon"];

/// Absolute URLs the browser may fetch as the page's favicon
pub fn favicon_candidates(
    link_elements: &[LinkElement],
    main_document_url: Option<&str>,
) -> HashSet<String> {
    let Some(base) = main_document_url.and_then(|url| Url::parse(url).ok()) else {
        return HashSet::new();
    };

    let icons: Vec<&LinkElement> = link_elements
        .iter()
        .filter(|link| {
            link.rel
                .as_deref()
                .map(|rel| ICON_RELS.contains(&rel.trim()))
                .unwrap_or(false)
        })
        .collect();

    let candidates: HashSet<String> = if icons.is_empty() {
        base.join(DEFAULT_FAVICON_PATH)
            .map(|url| url.to_string())
            .into_iter()
            .collect()
    } else {
        icons
            .iter()
            .filter_map(|link| link.href.as_deref())
            .filter_map(|href| base.join(href).ok())
            .map(|url| url.to_string())
            .collect()
    };

    debug!("Resolved {} favicon candidates", candidates.len());
    candidates
}
