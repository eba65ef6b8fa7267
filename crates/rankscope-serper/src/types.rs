//! Serper.dev API request and response types.
//!
//! Serper exposes Google SERP data as JSON. Only the `organic` block is
//! consumed here; ads, knowledge panels, and "people also ask" are ignored.

use serde::{Deserialize, Serialize};

/// Request body for the `POST /search` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPayload {
    pub q: String,
    pub num: u32,
    pub gl: &'static str,
    pub hl: &'static str,
    pub autocorrect: bool,
}

impl SearchPayload {
    /// Builds the standard payload for a localized query: 10 US/English
    /// results with autocorrect on.
    #[must_use]
    pub fn localized(term: &str, city: &str, state: &str) -> Self {
        Self {
            q: format!("{term} {city}, {state}"),
            num: 10,
            gl: "us",
            hl: "en",
            autocorrect: true,
        }
    }
}

/// Top-level search response. Fields other than `organic` are dropped at
/// deserialization time.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub organic: Vec<OrganicResult>,
}

/// A single organic result entry.
#[derive(Debug, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub position: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localized_payload_combines_term_and_location() {
        let payload = SearchPayload::localized("we buy houses", "Austin", "TX");
        assert_eq!(payload.q, "we buy houses Austin, TX");
        assert_eq!(payload.num, 10);
        assert_eq!(payload.gl, "us");
        assert_eq!(payload.hl, "en");
        assert!(payload.autocorrect);
    }

    #[test]
    fn response_without_organic_block_is_empty() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.organic.is_empty());
    }
}
