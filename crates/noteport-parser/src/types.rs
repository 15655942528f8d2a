//! Core content types shared by the parsers and the import pipeline

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Properties
// ============================================================================

/// A typed header property value
///
/// The header parsers only ever produce strings, booleans, string lists and
/// nulls. `Number` exists for values handed in by other producers (for example
/// a store that already holds typed data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<String>),
    Null,
}

impl PropertyValue {
    /// Borrow the string payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the list payload, if this is a list
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            PropertyValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// True for null and for the empty string
    pub fn is_blank(&self) -> bool {
        match self {
            PropertyValue::Null => true,
            PropertyValue::String(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::String(s) => f.write_str(s),
            PropertyValue::List(items) => f.write_str(&items.join(", ")),
            PropertyValue::Null => Ok(()),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        PropertyValue::List(value)
    }
}

/// Ordered property map
///
/// Keys keep the position of their first appearance. Re-inserting a key
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PropertyMap(IndexMap<String, PropertyValue>);

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value for the key
    ///
    /// Returns the replaced value.
    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue) -> Option<PropertyValue> {
        self.0.insert(key.into(), value)
    }

    /// Insert a value only if the key is not present yet
    ///
    /// Returns `true` when the value was inserted.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: PropertyValue) -> bool {
        match self.0.entry(key.into()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, PropertyValue)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, PropertyValue)>>(iter: I) -> Self {
        let mut map = PropertyMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

// ============================================================================
// Segments
// ============================================================================

/// A styled span of inline content
///
/// `Wikilink` holds the literal `[[name]]` (or `((id))`) text until the
/// reference pass replaces it. `Ref` holds the identifier of the target record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Segment {
    Text(String),
    Bold(String),
    Italic(String),
    Code(String),
    Wikilink(String),
    Ref(String),
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text(text.into())
    }

    /// The span's payload
    pub fn as_str(&self) -> &str {
        match self {
            Segment::Text(s)
            | Segment::Bold(s)
            | Segment::Italic(s)
            | Segment::Code(s)
            | Segment::Wikilink(s)
            | Segment::Ref(s) => s,
        }
    }

    /// Whether the reference pass should look inside this segment
    pub fn may_contain_reference(&self) -> bool {
        matches!(self, Segment::Text(_) | Segment::Wikilink(_))
    }

    pub fn is_ref(&self) -> bool {
        matches!(self, Segment::Ref(_))
    }
}

// ============================================================================
// Blocks
// ============================================================================

/// Block discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Heading,
    Ulist,
    Olist,
    Task,
    Quote,
    Code,
    Rule,
    Text,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::Ulist => "ulist",
            BlockKind::Olist => "olist",
            BlockKind::Task => "task",
            BlockKind::Quote => "quote",
            BlockKind::Code => "code",
            BlockKind::Rule => "rule",
            BlockKind::Text => "text",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed content unit
///
/// Every variant except `Code` and `Rule` carries inline segments. Code blocks
/// keep their raw lines untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        segments: Vec<Segment>,
    },
    #[serde(rename = "ulist")]
    UnorderedItem { segments: Vec<Segment> },
    #[serde(rename = "olist")]
    OrderedItem { segments: Vec<Segment> },
    Task {
        checked: bool,
        segments: Vec<Segment>,
    },
    Quote { segments: Vec<Segment> },
    Code {
        language: Option<String>,
        lines: Vec<String>,
    },
    Rule,
    Text { segments: Vec<Segment> },
}

impl Block {
    /// Empty paragraph used as a visual separator
    pub fn separator() -> Self {
        Block::Text {
            segments: vec![Segment::text("")],
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Heading { .. } => BlockKind::Heading,
            Block::UnorderedItem { .. } => BlockKind::Ulist,
            Block::OrderedItem { .. } => BlockKind::Olist,
            Block::Task { .. } => BlockKind::Task,
            Block::Quote { .. } => BlockKind::Quote,
            Block::Code { .. } => BlockKind::Code,
            Block::Rule => BlockKind::Rule,
            Block::Text { .. } => BlockKind::Text,
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading { .. })
    }

    pub fn segments(&self) -> Option<&[Segment]> {
        match self {
            Block::Heading { segments, .. }
            | Block::UnorderedItem { segments }
            | Block::OrderedItem { segments }
            | Block::Task { segments, .. }
            | Block::Quote { segments }
            | Block::Text { segments } => Some(segments),
            Block::Code { .. } | Block::Rule => None,
        }
    }

    pub fn segments_mut(&mut self) -> Option<&mut Vec<Segment>> {
        match self {
            Block::Heading { segments, .. }
            | Block::UnorderedItem { segments }
            | Block::OrderedItem { segments }
            | Block::Task { segments, .. }
            | Block::Quote { segments }
            | Block::Text { segments } => Some(segments),
            Block::Code { .. } | Block::Rule => None,
        }
    }

    /// Concatenated segment text, ignoring styling
    pub fn plain_text(&self) -> String {
        match self {
            Block::Code { lines, .. } => lines.join("\n"),
            Block::Rule => String::new(),
            _ => self
                .segments()
                .map(|segments| segments.iter().map(Segment::as_str).collect())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_map_keeps_first_position_on_replace() {
        let mut map = PropertyMap::new();
        map.insert("title", "one".into());
        map.insert("status", "draft".into());
        let old = map.insert("title", "two".into());

        assert_eq!(old, Some(PropertyValue::from("one")));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["title", "status"]);
        assert_eq!(map.get("title"), Some(&PropertyValue::from("two")));
    }

    #[test]
    fn test_property_map_insert_if_absent() {
        let mut map = PropertyMap::new();
        assert!(map.insert_if_absent("id", "a".into()));
        assert!(!map.insert_if_absent("id", "b".into()));
        assert_eq!(map.get("id"), Some(&PropertyValue::from("a")));
    }

    #[test]
    fn test_property_map_serializes_in_order() {
        let map: PropertyMap = vec![
            ("zeta", PropertyValue::Bool(true)),
            ("alpha", PropertyValue::List(vec!["a".into(), "b".into()])),
            ("empty", PropertyValue::Null),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"zeta":true,"alpha":["a","b"],"empty":null}"#);
    }

    #[test]
    fn test_segment_serialization_shape() {
        let json = serde_json::to_string(&Segment::Bold("hi".into())).unwrap();
        assert_eq!(json, r#"{"type":"bold","text":"hi"}"#);
    }

    #[test]
    fn test_block_kind_serialization() {
        let block = Block::UnorderedItem {
            segments: vec![Segment::text("item")],
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["kind"], "ulist");
        assert_eq!(block.kind(), BlockKind::Ulist);
    }

    #[test]
    fn test_plain_text_ignores_styling() {
        let block = Block::Text {
            segments: vec![
                Segment::text("Some "),
                Segment::Bold("bold".into()),
                Segment::text(" text"),
            ],
        };
        assert_eq!(block.plain_text(), "Some bold text");
        assert!(Block::Rule.segments().is_none());
    }
}
