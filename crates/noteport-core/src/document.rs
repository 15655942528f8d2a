//! Source documents

use noteport_config::ImportFormat;
use noteport_parser::{parse_header_as, ParsedHeader, SourceFormat};
use serde::Serialize;

/// One note file read from a vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Slash-separated path relative to the vault root
    pub path: String,

    /// File name without its extension
    pub base_name: String,

    /// Full file content
    #[serde(skip)]
    pub raw_content: String,
}

impl Document {
    pub fn new(path: impl Into<String>, raw_content: impl Into<String>) -> Self {
        let path = path.into().replace('\\', "/");
        let base_name = base_name_of(&path).to_string();
        Self {
            path,
            base_name,
            raw_content: raw_content.into(),
        }
    }

    /// First path component, when the file lives in a sub-folder
    pub fn top_folder(&self) -> Option<&str> {
        self.path
            .split_once('/')
            .map(|(first, _)| first)
            .filter(|first| !first.is_empty())
    }

    /// Header syntax to use for this document
    pub fn source_format(&self, format: ImportFormat) -> SourceFormat {
        match format {
            ImportFormat::Auto => SourceFormat::detect(&self.raw_content),
            ImportFormat::Markdown => SourceFormat::Markdown,
            ImportFormat::Outline => SourceFormat::Outline,
        }
    }

    /// Parse the header with the given format selection
    pub fn parse_header(&self, format: ImportFormat) -> ParsedHeader {
        parse_header_as(&self.raw_content, self.source_format(format))
    }
}

fn base_name_of(path: &str) -> &str {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}
