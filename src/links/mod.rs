//! Link data.
//!
//! # Data Flow
//! ```text
//! links source (upstream JSON or static config)
//!     → handler.rs (fetch, serve `/links`)
//!     → LinkCollection::parse (shape check, trim, reject empty fields)
//!     → page visitors (one anchor per link, source order)
//! ```
//!
//! # Design Decisions
//! - One JSON shape everywhere: `{"links": [{"name": .., "url": ..}, ..]}`
//! - Any malformed entry rejects the whole payload; nothing is skipped

pub mod handler;

use serde::{Deserialize, Serialize};

use crate::error::EdgeError;

pub use handler::LinkDataHandler;

/// A named link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub url: String,
}

impl Link {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Ordered list of links, serialized as `{"links": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkCollection {
    pub links: Vec<Link>,
}

#[derive(Deserialize)]
struct RawCollection {
    links: Vec<RawLink>,
}

#[derive(Deserialize)]
struct RawLink {
    name: Option<String>,
    url: Option<String>,
}

impl LinkCollection {
    /// Normalize an in-memory list with the same rules applied to payloads.
    pub fn new(links: Vec<Link>) -> Result<Self, EdgeError> {
        links
            .into_iter()
            .enumerate()
            .map(|(index, link)| normalize(index, Some(link.name), Some(link.url)))
            .collect::<Result<Vec<_>, _>>()
            .map(|links| Self { links })
    }

    /// Parse a JSON payload.
    pub fn parse(payload: &[u8]) -> Result<Self, EdgeError> {
        let raw: RawCollection = serde_json::from_slice(payload)
            .map_err(|e| EdgeError::MalformedLinkData(e.to_string()))?;

        raw.links
            .into_iter()
            .enumerate()
            .map(|(index, link)| normalize(index, link.name, link.url))
            .collect::<Result<Vec<_>, _>>()
            .map(|links| Self { links })
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Link> {
        self.links.iter()
    }
}

impl<'a> IntoIterator for &'a LinkCollection {
    type Item = &'a Link;
    type IntoIter = std::slice::Iter<'a, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

fn normalize(index: usize, name: Option<String>, url: Option<String>) -> Result<Link, EdgeError> {
    let field = |value: Option<String>, field: &str| {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                EdgeError::MalformedLinkData(format!("entry {} is missing `{}`", index, field))
            })
    };
    Ok(Link {
        name: field(name, "name")?,
        url: field(url, "url")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malformed(result: Result<LinkCollection, EdgeError>) -> String {
        match result {
            Err(EdgeError::MalformedLinkData(msg)) => msg,
            other => panic!("expected MalformedLinkData, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_preserves_order_and_trims() {
        let links = LinkCollection::parse(
            br#"{"links":[{"name":" A ","url":"https://a"},{"name":"B","url":"https://b\n"}]}"#,
        )
        .unwrap();
        assert_eq!(
            links.links,
            vec![Link::new("A", "https://a"), Link::new("B", "https://b")]
        );
    }

    #[test]
    fn test_serialized_form_parses_back() {
        let links = LinkCollection::new(vec![
            Link::new("Blog", "https://example.com/blog"),
            Link::new("Talks & slides", "https://example.com/?a=1&b=2"),
        ])
        .unwrap();
        let json = serde_json::to_vec(&links).unwrap();
        assert!(json.starts_with(br#"{"links":["#));
        assert_eq!(LinkCollection::parse(&json).unwrap(), links);
    }

    #[test]
    fn test_missing_url_is_malformed() {
        let msg = malformed(LinkCollection::parse(
            br#"{"links":[{"name":"A","url":"https://a"},{"name":"B"}]}"#,
        ));
        assert_eq!(msg, "entry 1 is missing `url`");
    }

    #[test]
    fn test_blank_name_is_malformed() {
        let msg = malformed(LinkCollection::parse(br#"{"links":[{"name":"  ","url":"https://a"}]}"#));
        assert_eq!(msg, "entry 0 is missing `name`");
    }

    #[test]
    fn test_bare_array_is_malformed() {
        malformed(LinkCollection::parse(br#"[{"name":"A","url":"https://a"}]"#));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        malformed(LinkCollection::parse(b"{\"links\": [}"));
        malformed(LinkCollection::parse(br#"{"items":[]}"#));
    }

    #[test]
    fn test_empty_list_is_valid() {
        let links = LinkCollection::parse(br#"{"links":[]}"#).unwrap();
        assert!(links.is_empty());
    }
}
