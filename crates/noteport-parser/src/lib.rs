//! Noteport Markdown Parser
//!
//! Tolerant parsers for note files exported from Obsidian-style vaults and
//! Logseq graphs. This crate provides:
//! - Header property parsing (YAML-lite frontmatter and `key:: value` outline properties)
//! - Whole-body normalization of vault-only syntax (callouts, highlights, comments, embeds)
//! - A line-oriented block parser producing typed blocks
//! - An inline parser producing styled segments with wikilink placeholders
//!
//! Nothing in this crate performs I/O and nothing in it fails: malformed input
//! always falls back to the most permissive interpretation.

pub mod blocks;
pub mod frontmatter;
pub mod inline;
pub mod normalize;
pub mod outline;
pub mod types;

pub use blocks::{parse_document_body, BlockParser};
pub use frontmatter::{parse_header, parse_header_as, ParsedHeader, SourceFormat};
pub use inline::parse_inline;
pub use normalize::normalize_body;
pub use outline::parse_outline_header;
pub use types::{Block, BlockKind, PropertyMap, PropertyValue, Segment};
