//! Wire types and display records.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::html::decode_entities;

/// Label used when a remote record has no usable title.
pub const UNTITLED: &str = "Untitled";

/// Opaque key of a remote record (post id, blog id).
///
/// Serialized untagged so it round-trips as `5` or `"5"` exactly as the
/// API sent it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Numeric id, the common case for WordPress objects.
    Int(u64),
    /// Any other key.
    Str(String),
}

impl Identifier {
    /// Parses user input: all-digit strings become numeric ids.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.parse::<u64>() {
            Ok(n) => Self::Int(n),
            Err(_) => Self::Str(trimmed.to_string()),
        }
    }

    /// Reads an identifier from a JSON value, rejecting empty or zero ids.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().filter(|n| *n != 0).map(Self::Int),
            Value::String(s) if !s.trim().is_empty() && s.trim() != "0" => Some(Self::parse(s)),
            _ => None,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Identifier {
    fn from(value: u32) -> Self {
        Self::Int(u64::from(value))
    }
}

impl From<i32> for Identifier {
    fn from(value: i32) -> Self {
        u64::try_from(value).map_or_else(|_| Self::Str(value.to_string()), Self::Int)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// Display-ready projection of a remote resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record key, serialized as `value` like a select option.
    #[serde(rename = "value")]
    pub id: Identifier,
    /// Text shown in result lists and chips.
    pub label: String,
}

impl Record {
    /// Creates a record.
    #[must_use]
    pub fn new(id: impl Into<Identifier>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// `{ "rendered": "..." }` field used by WordPress for titles.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderedField {
    /// Server-rendered HTML string.
    #[serde(default)]
    pub rendered: Option<String>,
}

/// A post (or any `wp/v2`-shaped resource) as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct RemotePost {
    /// Object id.
    #[serde(default)]
    pub id: Value,
    /// Title, absent on some custom resources.
    #[serde(default)]
    pub title: Option<RenderedField>,
}

impl RemotePost {
    /// Projects the post into a record, or `None` if it has no id.
    #[must_use]
    pub fn into_record(self) -> Option<Record> {
        let id = Identifier::from_json(&self.id)?;
        let label = self
            .title
            .and_then(|t| t.rendered)
            .map(|t| decode_entities(&t))
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        Some(Record { id, label })
    }

    /// Parses a JSON value into a record.
    #[must_use]
    pub fn record_from_json(value: &Value) -> Option<Record> {
        serde_json::from_value::<Self>(value.clone())
            .ok()
            .and_then(Self::into_record)
    }
}

/// A site of a multisite network, from the `hpu/v1/blogs` routes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSite {
    /// Blog id.
    #[serde(default)]
    pub id: Value,
    /// Site name (may contain HTML entities).
    #[serde(default)]
    pub name: Option<String>,
    /// Site path, e.g. `/news/`.
    #[serde(default)]
    pub path: Option<String>,
}

impl RemoteSite {
    /// Returns the parsed id, if any.
    #[must_use]
    pub fn identifier(&self) -> Option<Identifier> {
        Identifier::from_json(&self.id)
    }

    /// Returns the `"{name} - {path}"` label with entities decoded.
    #[must_use]
    pub fn label(&self) -> String {
        let name = self
            .name
            .as_deref()
            .map(decode_entities)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());
        let path = self.path.as_deref().map(decode_entities).unwrap_or_default();

        format!("{} - {}", name, path)
    }

    /// Projects the site into a record, or `None` if it has no id.
    #[must_use]
    pub fn to_record(&self) -> Option<Record> {
        self.identifier().map(|id| Record {
            id,
            label: self.label(),
        })
    }

    /// Parses a JSON value into a site.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        serde_json::from_value::<Self>(value.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identifier_parse() {
        assert_eq!(Identifier::parse("42"), Identifier::Int(42));
        assert_eq!(Identifier::parse(" 7 "), Identifier::Int(7));
        assert_eq!(Identifier::parse("abc"), Identifier::Str("abc".to_string()));
    }

    #[test]
    fn test_identifier_from_json_rejects_missing() {
        assert_eq!(Identifier::from_json(&json!(5)), Some(Identifier::Int(5)));
        assert_eq!(Identifier::from_json(&json!("12")), Some(Identifier::Int(12)));
        assert_eq!(Identifier::from_json(&json!(0)), None);
        assert_eq!(Identifier::from_json(&json!(null)), None);
        assert_eq!(Identifier::from_json(&json!("")), None);
    }

    #[test]
    fn test_identifier_serializes_untagged() {
        assert_eq!(serde_json::to_string(&Identifier::Int(5)).unwrap(), "5");
        assert_eq!(
            serde_json::to_string(&Identifier::Str("x".into())).unwrap(),
            "\"x\""
        );
    }

    #[test]
    fn test_post_record_uses_rendered_title() {
        let value = json!({ "id": 5, "title": { "rendered": "Budget Report" } });
        let record = RemotePost::record_from_json(&value).unwrap();
        assert_eq!(record, Record::new(5, "Budget Report"));
    }

    #[test]
    fn test_post_record_falls_back_to_untitled() {
        let missing = json!({ "id": 8 });
        let empty = json!({ "id": 9, "title": { "rendered": "" } });

        assert_eq!(RemotePost::record_from_json(&missing).unwrap().label, UNTITLED);
        assert_eq!(RemotePost::record_from_json(&empty).unwrap().label, UNTITLED);
    }

    #[test]
    fn test_post_without_id_is_skipped() {
        let value = json!({ "title": { "rendered": "Orphan" } });
        assert!(RemotePost::record_from_json(&value).is_none());
    }

    #[test]
    fn test_site_label_decodes_entities() {
        let site = RemoteSite::from_json(&json!({
            "id": 3,
            "name": "News &amp; Events",
            "path": "/news/"
        }))
        .unwrap();

        assert_eq!(site.label(), "News & Events - /news/");
        assert_eq!(site.to_record().unwrap().id, Identifier::Int(3));
    }

    #[test]
    fn test_site_label_fallbacks() {
        let site = RemoteSite::from_json(&json!({ "id": 4 })).unwrap();
        assert_eq!(site.label(), "Untitled - ");
    }

    #[test]
    fn test_record_serializes_as_option() {
        let json = serde_json::to_value(Record::new(5, "Budget Report")).unwrap();
        assert_eq!(json, json!({ "value": 5, "label": "Budget Report" }));
    }
}
