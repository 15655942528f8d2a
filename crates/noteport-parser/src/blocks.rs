//! Line-oriented block parser
//!
//! Every non-blank line outside a code fence becomes exactly one block. Line
//! shapes are tested in this order:
//!
//! 1. horizontal rule (`---`, `* * *`, `___`)
//! 2. ATX heading (`#` .. `######`)
//! 3. task item (`- [ ]`, `- [x]`)
//! 4. unordered item (`-`, `*`, `+`)
//! 5. ordered item (`1.`)
//! 6. blockquote (`>`)
//! 7. paragraph text
//!
//! Indentation is ignored: there is no list nesting and no paragraph merging.

use regex::Regex;
use std::sync::LazyLock;

use crate::inline::parse_inline;
use crate::normalize::normalize_body;
use crate::types::Block;

static FENCE_OPEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(`{3,})[ \t]*([^`\s]*)[^`]*$").expect("fence open regex")
});

static FENCE_CLOSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*(`{3,})[ \t]*$").expect("fence close regex"));

static RULE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:\*[ \t]*){3,}|(?:-[ \t]*){3,}|(?:_[ \t]*){3,})$").expect("rule regex")
});

static HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})(?:[ \t]+(.*?))?[ \t]*$").expect("heading regex"));

static TASK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-*+][ \t]+\[([ xX])\](?:[ \t]+(.*))?$").expect("task regex")
});

static UNORDERED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*+](?:[ \t]+(.*))?$").expect("unordered item regex"));

static ORDERED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.(?:[ \t]+(.*))?$").expect("ordered item regex"));

static QUOTE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^>[ \t]?(.*)$").expect("blockquote regex"));

/// Detect an opening fence, returning (fence length, language)
pub(crate) fn open_fence(line: &str) -> Option<(usize, Option<String>)> {
    let caps = FENCE_OPEN_REGEX.captures(line)?;
    let len = caps.get(1)?.as_str().len();
    let language = caps
        .get(2)
        .map(|m| m.as_str())
        .filter(|lang| !lang.is_empty())
        .map(str::to_string);
    Some((len, language))
}

/// A closing fence is at least as long as the opening one
pub(crate) fn closes_fence(line: &str, open_len: usize) -> bool {
    FENCE_CLOSE_REGEX
        .captures(line)
        .and_then(|caps| caps.get(1))
        .is_some_and(|m| m.as_str().len() >= open_len)
}

/// Code fence being collected
#[derive(Debug)]
struct OpenFence {
    len: usize,
    language: Option<String>,
    lines: Vec<String>,
}

impl OpenFence {
    fn finish(self) -> Block {
        Block::Code {
            language: self.language,
            lines: self.lines,
        }
    }
}

/// Block parser configuration
#[derive(Debug, Clone)]
pub struct BlockParser {
    normalize: bool,
}

impl BlockParser {
    /// Parser that normalizes vault syntax before splitting lines
    pub fn new() -> Self {
        Self { normalize: true }
    }

    /// Parser that sees the body exactly as given
    pub fn without_normalization() -> Self {
        Self { normalize: false }
    }

    /// Parse a document body into blocks, in source order
    pub fn parse(&self, body: &str) -> Vec<Block> {
        if self.normalize {
            parse_lines(&normalize_body(body))
        } else {
            parse_lines(body)
        }
    }
}

impl Default for BlockParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a document body with the default parser
pub fn parse_document_body(body: &str) -> Vec<Block> {
    BlockParser::new().parse(body)
}

fn parse_lines(body: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut fence: Option<OpenFence> = None;

    for line in body.lines() {
        if let Some(open) = fence.as_mut() {
            if closes_fence(line, open.len) {
                if let Some(done) = fence.take() {
                    blocks.push(done.finish());
                }
            } else {
                open.lines.push(line.to_string());
            }
            continue;
        }

        if let Some((len, language)) = open_fence(line) {
            fence = Some(OpenFence {
                len,
                language,
                lines: Vec::new(),
            });
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        blocks.push(classify_line(trimmed));
    }

    // unterminated fence keeps what it collected
    if let Some(open) = fence {
        blocks.push(open.finish());
    }

    blocks
}

fn classify_line(line: &str) -> Block {
    if RULE_REGEX.is_match(line) {
        return Block::Rule;
    }

    if let Some(caps) = HEADING_REGEX.captures(line) {
        let level = caps[1].len() as u8;
        let content = caps.get(2).map_or("", |m| m.as_str());
        return Block::Heading {
            level,
            segments: parse_inline(content),
        };
    }

    if let Some(caps) = TASK_REGEX.captures(line) {
        let checked = caps[1].eq_ignore_ascii_case("x");
        let content = caps.get(2).map_or("", |m| m.as_str());
        return Block::Task {
            checked,
            segments: parse_inline(content),
        };
    }

    if let Some(caps) = UNORDERED_REGEX.captures(line) {
        let content = caps.get(1).map_or("", |m| m.as_str());
        return Block::UnorderedItem {
            segments: parse_inline(content),
        };
    }

    if let Some(caps) = ORDERED_REGEX.captures(line) {
        let content = caps.get(1).map_or("", |m| m.as_str());
        return Block::OrderedItem {
            segments: parse_inline(content),
        };
    }

    if let Some(caps) = QUOTE_REGEX.captures(line) {
        let content = caps.get(1).map_or("", |m| m.as_str());
        return Block::Quote {
            segments: parse_inline(content),
        };
    }

    Block::Text {
        segments: parse_inline(line),
    }
}
