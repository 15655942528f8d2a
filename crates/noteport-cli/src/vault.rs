//! Filesystem document enumeration

use anyhow::{Context, Result};
use noteport_config::ScanConfig;
use noteport_core::Document;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Documents read from a vault directory
#[derive(Debug, Default)]
pub struct Vault {
    /// Sorted by relative path
    pub documents: Vec<Document>,
    /// Sorted top-level folder names
    pub top_folders: Vec<String>,
}

/// Walk `root` and read every note file
///
/// Hidden entries (unless `include_hidden`) and `excluded_dirs` are skipped.
/// `excluded_dirs` entries match a directory name anywhere in the tree, or a
/// relative path from the root when they contain a `/`.
pub fn read_vault(root: &Path, config: &ScanConfig) -> Result<Vault> {
    if !root.is_dir() {
        anyhow::bail!("Vault directory does not exist: {}", root.display());
    }

    let mut documents = Vec::new();
    let mut top_folders = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped(e, root, config));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }

        if entry.file_type().is_dir() {
            if entry.depth() == 1 {
                top_folders.push(entry.file_name().to_string_lossy().into_owned());
            }
            continue;
        }

        if !entry.file_type().is_file() || !has_note_extension(entry.path(), config) {
            continue;
        }

        let relative = relative_path(entry.path(), root);
        match std::fs::read_to_string(entry.path()) {
            Ok(content) => documents.push(Document::new(relative, content)),
            Err(err) => warn!(path = %relative, error = %err, "skipping unreadable file"),
        }
    }

    documents.sort_by(|a, b| a.path.cmp(&b.path));
    top_folders.sort();
    debug!(
        documents = documents.len(),
        folders = top_folders.len(),
        "read vault"
    );

    Ok(Vault {
        documents,
        top_folders,
    })
}

/// Read a single note file
pub fn read_document(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Document::new(name, content))
}

fn is_skipped(entry: &DirEntry, root: &Path, config: &ScanConfig) -> bool {
    let name = entry.file_name().to_string_lossy();
    if !config.include_hidden && name.starts_with('.') {
        return true;
    }
    if !entry.file_type().is_dir() {
        return false;
    }

    let relative = relative_path(entry.path(), root);
    config.excluded_dirs.iter().any(|excluded| {
        let excluded = excluded.trim_matches('/');
        if excluded.contains('/') {
            relative == excluded
        } else {
            name == excluded
        }
    })
}

fn has_note_extension(path: &Path, config: &ScanConfig) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            config
                .extensions
                .iter()
                .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn relative_path(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn sample_vault() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "b.md", "root note");
        write(root, "Projects/Alpha.md", "# Alpha");
        write(root, "Projects/deep/Gamma.MD", "gamma");
        write(root, "Areas/notes.txt", "not a note");
        write(root, ".obsidian/workspace.md", "hidden");
        write(root, ".hidden.md", "hidden file");
        write(root, "node_modules/pkg/readme.md", "excluded");
        write(root, "logseq/bak/old.md", "excluded path");
        write(root, "logseq/pages/Kept.md", "kept");
        dir
    }

    #[test]
    fn test_reads_notes_sorted_by_path() {
        let dir = sample_vault();
        let vault = read_vault(dir.path(), &ScanConfig::default()).unwrap();

        let paths: Vec<&str> = vault.documents.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "Projects/Alpha.md",
                "Projects/deep/Gamma.MD",
                "b.md",
                "logseq/pages/Kept.md",
            ]
        );
    }

    #[test]
    fn test_top_folders_exclude_hidden_and_excluded() {
        let dir = sample_vault();
        let vault = read_vault(dir.path(), &ScanConfig::default()).unwrap();
        assert_eq!(vault.top_folders, vec!["Areas", "Projects", "logseq"]);
    }

    #[test]
    fn test_include_hidden() {
        let dir = sample_vault();
        let config = ScanConfig {
            include_hidden: true,
            excluded_dirs: Vec::new(),
            ..ScanConfig::default()
        };
        let vault = read_vault(dir.path(), &config).unwrap();
        assert!(vault.documents.iter().any(|d| d.path == ".hidden.md"));
        assert!(vault.documents.iter().any(|d| d.path == ".obsidian/workspace.md"));
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        assert!(read_vault(&dir.path().join("missing"), &ScanConfig::default()).is_err());
    }
}
