//! Identifier slugs and property key variations

use regex::Regex;
use std::sync::LazyLock;

static NON_SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("slug regex"));

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

static CAMEL_BOUNDARY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("camel case regex"));

/// Lowercase, collapse every run of non `[a-z0-9]` characters to `_`, trim `_`
///
/// Returns an empty string when nothing identifier-safe remains.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    NON_SLUG_REGEX
        .replace_all(&lower, "_")
        .trim_matches('_')
        .to_string()
}

/// Candidate field ids for a property key, most specific first
///
/// Order: slug, the key as written, lowercase, lowercase with whitespace runs
/// as `_`, camelCase split to snake_case. Duplicates are dropped.
pub fn field_variations(key: &str) -> Vec<String> {
    let lower = key.to_lowercase();
    let candidates = [
        slugify(key),
        key.to_string(),
        lower.clone(),
        WHITESPACE_REGEX.replace_all(&lower, "_").into_owned(),
        CAMEL_BOUNDARY_REGEX
            .replace_all(key, "${1}_${2}")
            .to_lowercase(),
    ];

    let mut variations: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !candidate.is_empty() && !variations.contains(&candidate) {
            variations.push(candidate);
        }
    }
    variations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My Tag"), "my_tag");
        assert_eq!(slugify("my-tag"), "my_tag");
        assert_eq!(slugify("  Due Date!! "), "due_date");
        assert_eq!(slugify("created_at"), "created_at");
        assert_eq!(slugify("???"), "");
        assert_eq!(slugify("Café"), "caf");
    }

    #[test]
    fn test_field_variations_order() {
        assert_eq!(
            field_variations("Due Date"),
            vec!["due_date", "Due Date", "due date"]
        );
        assert_eq!(
            field_variations("dueDate"),
            vec!["duedate", "dueDate", "due_date"]
        );
    }

    #[test]
    fn test_field_variations_deduplicated() {
        assert_eq!(field_variations("status"), vec!["status"]);
    }
}
