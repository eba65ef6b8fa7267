//! Domain-string helpers shared by the search client and the engine.

use std::collections::HashSet;

use url::Url;

/// Extract the base domain from a URL, lowercased, with any leading `www.`
/// stripped. Returns `None` for unparsable input or URLs without a host
/// (e.g. `mailto:` links).
#[must_use]
pub fn extract_base_domain(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let base = host.strip_prefix("www.").unwrap_or(&host);
    if base.is_empty() {
        return None;
    }
    Some(base.to_owned())
}

/// Remove duplicate domains while preserving first-seen order.
#[must_use]
pub fn deduplicate_domains<I>(domains: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    domains
        .into_iter()
        .filter(|d| seen.insert(d.clone()))
        .collect()
}
