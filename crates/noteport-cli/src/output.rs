//! Terminal and file output helpers

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

pub fn success(message: &str) {
    eprintln!("{} {}", "Success:".green().bold(), message);
}

pub fn info(message: &str) {
    eprintln!("{} {}", "Info:".cyan().bold(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), message);
}

/// Print a `label: value` line to stdout
pub fn stat(label: &str, value: impl std::fmt::Display) {
    println!("  {:<20} {}", format!("{}:", label), value.to_string().cyan());
}

/// Write text to `path`, creating parent directories
pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

/// Pretty-printed JSON
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

/// Write pretty-printed JSON to `path`
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut json = to_json(value)?;
    json.push('\n');
    write_text(path, &json)
}
