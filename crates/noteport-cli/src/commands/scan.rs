use anyhow::{Context, Result};
use noteport_config::NoteportConfig;
use noteport_core::{render_scan_report, ScanSummary, SchemaBuilder, TypeInferenceEngine};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::output;
use crate::vault::read_vault;

/// Execute the scan command
///
/// Walks the vault, infers a field type per property, builds the schema and
/// renders the Markdown report (stdout unless `out` is given).
pub async fn execute(
    config: &NoteportConfig,
    dir: &Path,
    name: &str,
    out: Option<PathBuf>,
    schema_out: Option<PathBuf>,
) -> Result<()> {
    let vault = read_vault(dir, &config.scan)?;
    info!(documents = vault.documents.len(), dir = %dir.display(), "scanning vault");

    let analysis = TypeInferenceEngine::from_config(&config.scan)
        .with_format(config.import.format)
        .analyze(&vault.documents);

    let schema = SchemaBuilder::from_config(name, config)
        .build(&vault.top_folders, &analysis.properties)
        .context("Generated schema is invalid")?;

    let scan = ScanSummary {
        total_files: vault.documents.len(),
        top_folders: vault.top_folders,
    };
    let report = render_scan_report(name, &scan, &analysis, &schema)?;

    if let Some(path) = schema_out {
        output::write_text(&path, &schema.to_json_pretty()?)?;
        output::success(&format!("Schema written to {}", path.display()));
    }

    match out {
        Some(path) => {
            output::write_text(&path, &report)?;
            output::success(&format!(
                "Scanned {} files ({} properties), report written to {}",
                scan.total_files,
                analysis.properties.len(),
                path.display()
            ));
        }
        None => print!("{}", report),
    }

    Ok(())
}
