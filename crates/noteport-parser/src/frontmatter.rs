//! YAML-lite frontmatter parsing
//!
//! Supports the subset of YAML that vault notes actually use:
//! - `key: value` scalars, with one layer of matching quotes stripped
//! - inline lists `key: [a, b, c]`
//! - block lists (`key:` followed by `- item` lines)
//! - the literals `true` / `false`
//!
//! Everything else stays a string. Lines that do not look like properties are
//! skipped; parsing never fails.

use serde::Serialize;

use crate::outline::{parse_outline_header, PROPERTY_LINE};
use crate::types::{PropertyMap, PropertyValue};

const DELIMITER: &str = "---";

/// Header syntax of a source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Markdown with optional `---` frontmatter
    Markdown,
    /// Logseq-style outline with `key:: value` properties
    Outline,
}

impl SourceFormat {
    /// Guess the format from raw content
    ///
    /// A leading `---` line means frontmatter; otherwise any `key:: value`
    /// line marks the document as an outline.
    pub fn detect(raw: &str) -> Self {
        let content = raw.trim_start_matches('\u{feff}');
        if content.lines().next().map(str::trim_end) == Some(DELIMITER) {
            return SourceFormat::Markdown;
        }
        if content.lines().any(|line| PROPERTY_LINE.is_match(line)) {
            SourceFormat::Outline
        } else {
            SourceFormat::Markdown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Markdown => "markdown",
            SourceFormat::Outline => "outline",
        }
    }
}

/// Result of header parsing
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedHeader {
    /// Document-level properties
    pub properties: PropertyMap,

    /// Remaining content for the block parser
    pub body: String,

    /// Block ids declared with `id:: value` (outline documents only)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub block_ids: Vec<String>,
}

/// Parse YAML-lite frontmatter
///
/// Without a `---` ... `---` pair the properties are empty and the whole
/// content is the body.
pub fn parse_header(raw: &str) -> ParsedHeader {
    match split_frontmatter(raw) {
        Some((header, body)) => ParsedHeader {
            properties: parse_yaml_lite(header),
            body: body.to_string(),
            block_ids: Vec::new(),
        },
        None => ParsedHeader {
            properties: PropertyMap::new(),
            body: raw.to_string(),
            block_ids: Vec::new(),
        },
    }
}

/// Parse the header using an explicit source format
pub fn parse_header_as(raw: &str, format: SourceFormat) -> ParsedHeader {
    match format {
        SourceFormat::Markdown => parse_header(raw),
        SourceFormat::Outline => parse_outline_header(raw),
    }
}

/// Split content into (header, body) at the frontmatter delimiters
fn split_frontmatter(raw: &str) -> Option<(&str, &str)> {
    let content = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut lines = content.split_inclusive('\n');

    let first = lines.next()?;
    if first.trim_end() != DELIMITER {
        return None;
    }

    let header_start = first.len();
    let mut offset = header_start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            let header = content[header_start..offset].trim_end_matches(['\n', '\r']);
            let body = &content[offset + line.len()..];
            return Some((header, body));
        }
        offset += line.len();
    }

    None
}

fn parse_yaml_lite(header: &str) -> PropertyMap {
    let mut properties = PropertyMap::new();
    let mut collector: Option<(String, Vec<String>)> = None;

    for line in header.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(item) = trimmed.strip_prefix('-') {
            if let Some((_, items)) = collector.as_mut() {
                let item = item.trim();
                if !item.is_empty() {
                    items.push(item.to_string());
                }
            }
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        if let Some((list_key, items)) = collector.take() {
            properties.insert(list_key, finish_list(items));
        }

        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        let value = strip_quotes(value.trim());
        if value.is_empty() {
            collector = Some((key.to_string(), Vec::new()));
            continue;
        }

        properties.insert(key, coerce_scalar(value));
    }

    if let Some((list_key, items)) = collector {
        properties.insert(list_key, finish_list(items));
    }

    properties
}

/// A `key:` with no items is a null, not an empty list
fn finish_list(items: Vec<String>) -> PropertyValue {
    if items.is_empty() {
        PropertyValue::Null
    } else {
        PropertyValue::List(items)
    }
}

/// Strip one layer of matching straight or single quotes
pub(crate) fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Interpret an unquoted scalar
pub(crate) fn coerce_scalar(value: &str) -> PropertyValue {
    // `[[page]], [[other]]` is a link list, not an inline YAML list
    let inline_list = if value.starts_with("[[") {
        None
    } else {
        value.strip_prefix('[').and_then(|v| v.strip_suffix(']'))
    };
    if let Some(inner) = inline_list {
        let items = inner
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
        return PropertyValue::List(items);
    }

    if let Some(item) = value.strip_prefix('-') {
        let item = item.trim();
        let items = if item.is_empty() {
            Vec::new()
        } else {
            vec![item.to_string()]
        };
        return PropertyValue::List(items);
    }

    match value {
        "true" => PropertyValue::Bool(true),
        "false" => PropertyValue::Bool(false),
        _ => PropertyValue::String(value.to_string()),
    }
}
