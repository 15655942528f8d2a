//! Inline formatting
//!
//! Scans a line for the earliest inline construct and splits it into styled
//! segments. Supported syntax, in tie-break order:
//! - inline code: `` `code` ``
//! - wikilinks: `[[note]]` (kept verbatim for the reference pass)
//! - Markdown links: `[label](url)` (reduced to the label)
//! - bold: `**text**`, `__text__`
//! - italic: `*text*`, `_text_`
//!
//! Constructs do not nest: the inside of bold or italic text is not parsed again.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::types::Segment;

static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("inline code regex"));

static WIKILINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]]+)\]\]").expect("wikilink regex"));

static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]+)\]\(([^)]*)\)").expect("markdown link regex"));

static BOLD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").expect("bold regex"));

static ITALIC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+)\*|_([^_]+)_").expect("italic regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InlineKind {
    Code,
    Wikilink,
    Link,
    Bold,
    Italic,
}

/// Tie-break order when two constructs start at the same offset
const PRIORITY: [InlineKind; 5] = [
    InlineKind::Code,
    InlineKind::Wikilink,
    InlineKind::Link,
    InlineKind::Bold,
    InlineKind::Italic,
];

impl InlineKind {
    fn regex(self) -> &'static Regex {
        match self {
            InlineKind::Code => &CODE_REGEX,
            InlineKind::Wikilink => &WIKILINK_REGEX,
            InlineKind::Link => &LINK_REGEX,
            InlineKind::Bold => &BOLD_REGEX,
            InlineKind::Italic => &ITALIC_REGEX,
        }
    }

    fn is_emphasis(self) -> bool {
        matches!(self, InlineKind::Bold | InlineKind::Italic)
    }
}

#[derive(Debug)]
struct InlineMatch {
    start: usize,
    end: usize,
    segment: Segment,
}

/// Split a line into styled segments
///
/// Never returns an empty vector: a line without any construct (including the
/// empty line) becomes a single text segment.
pub fn parse_inline(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let Some(found) = earliest_match(text, pos) else {
            break;
        };
        if found.start > pos {
            segments.push(Segment::Text(text[pos..found.start].to_string()));
        }
        segments.push(found.segment);
        pos = found.end;
    }

    if pos < text.len() {
        segments.push(Segment::Text(text[pos..].to_string()));
    }

    if segments.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }

    segments
}

fn earliest_match(text: &str, from: usize) -> Option<InlineMatch> {
    let mut best: Option<InlineMatch> = None;

    for kind in PRIORITY {
        let Some(candidate) = first_valid_match(kind, text, from) else {
            continue;
        };
        // strict comparison keeps the higher-priority construct on ties
        if best.as_ref().map_or(true, |b| candidate.start < b.start) {
            best = Some(candidate);
        }
    }

    best
}

fn first_valid_match(kind: InlineKind, text: &str, from: usize) -> Option<InlineMatch> {
    let regex = kind.regex();
    let mut at = from;

    while at <= text.len() {
        let caps = regex.captures_at(text, at)?;
        let whole = caps.get(0)?;

        if !kind.is_emphasis() || is_valid_emphasis(text, &caps) {
            return Some(InlineMatch {
                start: whole.start(),
                end: whole.end(),
                segment: to_segment(kind, &caps),
            });
        }

        // retry one character past this candidate's start
        let step = text[whole.start()..].chars().next().map_or(1, char::len_utf8);
        at = whole.start() + step;
    }

    None
}

/// Emphasis must hug its content, and underscore emphasis must not sit inside a word
fn is_valid_emphasis(text: &str, caps: &Captures<'_>) -> bool {
    let Some(whole) = caps.get(0) else {
        return false;
    };
    let inner = first_group(caps);
    if inner.is_empty() || inner.trim() != inner {
        return false;
    }

    if whole.as_str().starts_with('_') {
        let before = text[..whole.start()].chars().next_back();
        let after = text[whole.end()..].chars().next();
        let is_word = |c: Option<char>| c.is_some_and(char::is_alphanumeric);
        if is_word(before) || is_word(after) {
            return false;
        }
    }

    true
}

/// Content of whichever alternative matched
fn first_group<'t>(caps: &Captures<'t>) -> &'t str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str())
        .unwrap_or("")
}

fn to_segment(kind: InlineKind, caps: &Captures<'_>) -> Segment {
    match kind {
        InlineKind::Code => Segment::Code(first_group(caps).to_string()),
        InlineKind::Wikilink => Segment::Wikilink(caps[0].to_string()),
        InlineKind::Link => Segment::Text(first_group(caps).to_string()),
        InlineKind::Bold => Segment::Bold(first_group(caps).to_string()),
        InlineKind::Italic => Segment::Italic(first_group(caps).to_string()),
    }
}
