//! Whole-body normalization of vault-only syntax
//!
//! Runs before block detection and rewrites constructs the block parser does
//! not model:
//! - callouts `> [!note] Title` become `> **note: Title**`
//! - highlights `==text==` become `**text**`
//! - comments `%%...%%` are removed
//! - embeds `![[file]]` become `![Attachment: file]`
//!
//! Fenced code is copied through untouched.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::blocks::{closes_fence, open_fence};

static CALLOUT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^>[ \t]*\[!(\w+)\][+-]?[ \t]*(.*?)[ \t]*$").expect("callout regex")
});

static HIGHLIGHT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"==([^=\n]+)==").expect("highlight regex"));

static COMMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%%[^%]*%%").expect("comment regex"));

static EMBED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\[([^\]]+)\]\]").expect("embed regex"));

/// Apply all rewrites to the prose parts of a document body
pub fn normalize_body(body: &str) -> String {
    let mut output = String::with_capacity(body.len());
    let mut prose = String::new();
    let mut fence: Option<usize> = None;

    for line in body.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        match fence {
            Some(len) => {
                output.push_str(line);
                if closes_fence(content, len) {
                    fence = None;
                }
            }
            None => {
                if let Some((len, _)) = open_fence(content) {
                    output.push_str(&rewrite_prose(&prose));
                    prose.clear();
                    output.push_str(line);
                    fence = Some(len);
                } else {
                    prose.push_str(line);
                }
            }
        }
    }

    output.push_str(&rewrite_prose(&prose));
    output
}

fn rewrite_prose(prose: &str) -> String {
    if prose.is_empty() {
        return String::new();
    }

    let text = CALLOUT_REGEX.replace_all(prose, |caps: &Captures<'_>| {
        let kind = &caps[1];
        let title = &caps[2];
        if title.is_empty() {
            format!("> **{}**", kind)
        } else {
            format!("> **{}: {}**", kind, title)
        }
    });
    let text = HIGHLIGHT_REGEX.replace_all(&text, "**$1**");
    let text = COMMENT_REGEX.replace_all(&text, "");
    let text = EMBED_REGEX.replace_all(&text, "![Attachment: $1]");
    text.into_owned()
}
