//! Logseq outline property parsing
//!
//! Outline documents declare properties as `key:: value` lines, either at the
//! top of the page or underneath a bullet. Only shallow properties (depth 0 or
//! 1) describe the page itself; deeper ones belong to nested blocks.
//!
//! Property lines stay visible content, so the body is the full document.

use regex::Regex;
use std::sync::LazyLock;

use crate::frontmatter::{coerce_scalar, strip_quotes, ParsedHeader};
use crate::types::PropertyMap;

/// `[indent][- ]key:: value`
pub(crate) static PROPERTY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>[ \t]*)(?:[-*+][ \t]+)?(?P<key>[A-Za-z0-9_][A-Za-z0-9_.\-]*)::(?:[ \t]+(?P<value>.*?))?[ \t]*$")
        .expect("outline property regex")
});

/// Deepest indentation whose properties count as page properties
const MAX_PAGE_PROPERTY_DEPTH: usize = 1;

/// Parse `key:: value` properties from an outline document
pub fn parse_outline_header(raw: &str) -> ParsedHeader {
    let mut properties = PropertyMap::new();
    let mut block_ids: Vec<String> = Vec::new();

    for line in raw.lines() {
        let Some(caps) = PROPERTY_LINE.captures(line) else {
            continue;
        };

        let key = &caps["key"];
        let value = caps.name("value").map(|m| m.as_str().trim()).unwrap_or("");
        if value.is_empty() {
            continue;
        }

        if key.eq_ignore_ascii_case("id") && !block_ids.iter().any(|id| id == value) {
            block_ids.push(value.to_string());
        }

        if indent_depth(&caps["indent"]) <= MAX_PAGE_PROPERTY_DEPTH {
            properties.insert_if_absent(key, coerce_scalar(strip_quotes(value)));
        }
    }

    ParsedHeader {
        properties,
        body: raw.to_string(),
        block_ids,
    }
}

/// Tabs count one level each, spaces two per level
fn indent_depth(indent: &str) -> usize {
    let tabs = indent.chars().filter(|&c| c == '\t').count();
    let spaces = indent.chars().filter(|&c| c == ' ').count();
    tabs + spaces / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PropertyValue;

    const PAGE: &str = "title:: Project Plan\ntype:: project\n- First block\n  id:: 64f1c2a0-aaaa\n\t- Nested\n\t  status:: deep\n\t  id:: 64f1c2a0-bbbb\n- type:: ignored duplicate\n";

    #[test]
    fn test_page_properties_captured() {
        let parsed = parse_outline_header(PAGE);
        assert_eq!(
            parsed.properties.get("title"),
            Some(&PropertyValue::from("Project Plan"))
        );
        assert_eq!(parsed.properties.get("type"), Some(&PropertyValue::from("project")));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let parsed = parse_outline_header(PAGE);
        assert_eq!(parsed.properties.get("type"), Some(&PropertyValue::from("project")));
    }

    #[test]
    fn test_deep_properties_not_captured() {
        let parsed = parse_outline_header(PAGE);
        assert!(parsed.properties.get("status").is_none());
    }

    #[test]
    fn test_block_ids_recorded_at_any_depth() {
        let parsed = parse_outline_header(PAGE);
        assert_eq!(parsed.block_ids, vec!["64f1c2a0-aaaa", "64f1c2a0-bbbb"]);
        // depth-1 id is also a page property
        assert_eq!(
            parsed.properties.get("id"),
            Some(&PropertyValue::from("64f1c2a0-aaaa"))
        );
    }

    #[test]
    fn test_body_is_full_document() {
        let parsed = parse_outline_header(PAGE);
        assert_eq!(parsed.body, PAGE);
    }

    #[test]
    fn test_id_key_is_case_insensitive() {
        let parsed = parse_outline_header("- block\n      ID:: upper-case\n");
        assert_eq!(parsed.block_ids, vec!["upper-case"]);
        assert!(parsed.properties.is_empty());
    }

    #[test]
    fn test_indent_depth() {
        assert_eq!(indent_depth(""), 0);
        assert_eq!(indent_depth("  "), 1);
        assert_eq!(indent_depth("\t"), 1);
        assert_eq!(indent_depth("\t  "), 2);
    }
}
