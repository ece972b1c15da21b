//! Typed codec for the listing's URL query parameters.
//!
//! `search` and `page` are the whole of the listing state. Missing or empty
//! values fall back to their defaults, and defaults are left out when
//! encoding so equivalent views share one canonical URL.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("invalid page {0:?}: expected a non-negative integer")]
    InvalidPage(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawListParams")]
pub struct ListParams {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub search: String,
    #[serde(skip_serializing_if = "is_first_page")]
    pub page: u32,
}

fn is_first_page(page: &u32) -> bool {
    *page == 0
}

/// Wire shape: every value arrives as an optional string.
#[derive(Debug, Default, Deserialize)]
struct RawListParams {
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    page: Option<String>,
}

impl TryFrom<RawListParams> for ListParams {
    type Error = ParamsError;

    fn try_from(raw: RawListParams) -> Result<Self, Self::Error> {
        Self::parse(raw.search.unwrap_or_default(), raw.page.as_deref())
    }
}

impl ListParams {
    pub fn new(search: impl Into<String>, page: u32) -> Self {
        Self {
            search: search.into(),
            page,
        }
    }

    /// Builds params from their textual form; a missing or blank page is
    /// the first page.
    pub fn parse(search: impl Into<String>, page: Option<&str>) -> Result<Self, ParamsError> {
        let page = match page.map(str::trim) {
            None | Some("") => 0,
            Some(s) => s
                .parse::<u32>()
                .map_err(|_| ParamsError::InvalidPage(s.to_string()))?,
        };
        Ok(Self::new(search, page))
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self::new(self.search.clone(), page)
    }

    pub fn next(&self) -> Self {
        self.with_page(self.page.saturating_add(1))
    }

    /// The previous page, or `None` on the first one.
    pub fn previous(&self) -> Option<Self> {
        self.page.checked_sub(1).map(|page| self.with_page(page))
    }

    pub fn is_default(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> Result<ListParams, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn missing_values_use_defaults() {
        assert_eq!(decode(json!({})).unwrap(), ListParams::default());
    }

    #[test]
    fn empty_page_is_first_page() {
        let params = decode(json!({ "search": "737", "page": "" })).unwrap();
        assert_eq!(params, ListParams::new("737", 0));
    }

    #[test]
    fn page_is_parsed_from_string() {
        let params = decode(json!({ "page": "3" })).unwrap();
        assert_eq!(params.page, 3);
    }

    #[test]
    fn rejects_negative_and_garbage_pages() {
        assert!(decode(json!({ "page": "-1" })).is_err());
        assert!(decode(json!({ "page": "two" })).is_err());
    }

    #[test]
    fn encoding_omits_defaults() {
        let value = serde_json::to_value(ListParams::default()).unwrap();
        assert_eq!(value, json!({}));

        let value = serde_json::to_value(ListParams::new("a", 2)).unwrap();
        assert_eq!(value, json!({ "search": "a", "page": 2 }));
    }

    #[test]
    fn parse_shares_decoding_rules() {
        assert_eq!(ListParams::parse("a", None).unwrap(), ListParams::new("a", 0));
        assert_eq!(ListParams::parse("a", Some(" 2 ")).unwrap(), ListParams::new("a", 2));
        assert_eq!(
            ListParams::parse("a", Some("-1")),
            Err(ParamsError::InvalidPage("-1".into()))
        );
    }

    #[test]
    fn previous_stops_at_first_page() {
        assert_eq!(ListParams::new("", 0).previous(), None);
        assert_eq!(
            ListParams::new("x", 2).previous(),
            Some(ListParams::new("x", 1))
        );
        assert_eq!(ListParams::new("x", 2).next(), ListParams::new("x", 3));
    }
}
