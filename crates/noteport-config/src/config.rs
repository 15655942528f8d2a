//! Configuration sections and their defaults

use serde::{Deserialize, Serialize};

/// Top-level configuration
///
/// Every section is optional in the file; missing sections and keys take
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteportConfig {
    /// Vault scanning and type inference
    pub scan: ScanConfig,
    /// Generated schema settings
    pub schema: SchemaConfig,
    /// Record import settings
    pub import: ImportConfig,
    /// Log output
    pub logging: LoggingConfig,
}

/// Vault scanning configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum number of documents sampled for type inference
    pub sample_limit: usize,
    /// Example values kept per property
    pub example_limit: usize,
    /// Properties seen in fewer documents (percent) do not become fields
    pub min_field_percentage: u32,
    /// Directory names or relative paths skipped while walking the vault
    pub excluded_dirs: Vec<String>,
    /// File extensions treated as notes, without the dot
    pub extensions: Vec<String>,
    /// Walk into dot-directories and read dot-files
    pub include_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            sample_limit: 500,
            example_limit: 5,
            min_field_percentage: 5,
            excluded_dirs: vec![
                "node_modules".to_string(),
                ".obsidian".to_string(),
                ".trash".to_string(),
                ".logseq".to_string(),
                "logseq/bak".to_string(),
            ],
            extensions: vec!["md".to_string()],
            include_hidden: false,
        }
    }
}

/// Generated schema configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Singular name for one record
    pub item_name: String,
    /// Collection icon (a `ti-` icon name)
    pub icon: String,
    /// Fields shown in the table view
    pub table_view_fields: usize,
    /// Fields shown on board cards
    pub board_view_fields: usize,
    /// Source named in the collection description
    pub source_label: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            item_name: "Note".to_string(),
            icon: "ti-notebook".to_string(),
            table_view_fields: 8,
            board_view_fields: 6,
            source_label: "Obsidian".to_string(),
        }
    }
}

/// Header syntax selection for import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    /// Detect per document
    #[default]
    Auto,
    /// YAML-lite frontmatter
    Markdown,
    /// `key:: value` outline properties
    Outline,
}

impl ImportFormat {
    /// Lowercase name as written in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportFormat::Auto => "auto",
            ImportFormat::Markdown => "markdown",
            ImportFormat::Outline => "outline",
        }
    }
}

/// Record import configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Header syntax of the source documents
    pub format: ImportFormat,
    /// Insert an empty block before every heading except the first block
    pub heading_separators: bool,
    /// Folder value for documents at the vault root
    pub root_folder_label: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            format: ImportFormat::Auto,
            heading_separators: true,
            root_folder_label: "Root".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive: `error`, `warn`, `info`, `debug`, `trace` or an env-filter string
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_defaults() {
        let scan = ScanConfig::default();
        assert_eq!(scan.sample_limit, 500);
        assert_eq!(scan.example_limit, 5);
        assert_eq!(scan.min_field_percentage, 5);
        assert!(scan.excluded_dirs.iter().any(|d| d == ".obsidian"));
        assert_eq!(scan.extensions, vec!["md"]);
        assert!(!scan.include_hidden);
    }

    #[test]
    fn test_schema_defaults() {
        let schema = SchemaConfig::default();
        assert_eq!(schema.item_name, "Note");
        assert!(schema.icon.starts_with("ti-"));
        assert_eq!(schema.table_view_fields, 8);
        assert_eq!(schema.board_view_fields, 6);
    }

    #[test]
    fn test_import_format_names() {
        assert_eq!(ImportFormat::default(), ImportFormat::Auto);
        assert_eq!(ImportFormat::Outline.as_str(), "outline");
    }
}
