use anyhow::{Context, Result};
use noteport_config::NoteportConfig;
use noteport_core::{ImportSession, MemoryRecordStore, Schema};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::output;
use crate::vault::read_vault;

/// Execute the import command
///
/// Phase 1 writes one record per document into the in-memory store; Phase 2
/// resolves wikilinks and block references once every record exists.
pub async fn execute(
    config: &NoteportConfig,
    dir: &Path,
    schema_path: &Path,
    out: Option<PathBuf>,
    no_resolve: bool,
) -> Result<()> {
    let raw = std::fs::read_to_string(schema_path)
        .with_context(|| format!("Failed to read schema {}", schema_path.display()))?;
    let schema = Schema::from_json(&raw)
        .with_context(|| format!("Invalid schema {}", schema_path.display()))?;

    let vault = read_vault(dir, &config.scan)?;
    if vault.documents.is_empty() {
        output::warning(&format!("No documents found in {}", dir.display()));
    }

    let store = Arc::new(MemoryRecordStore::new());
    let mut session = ImportSession::begin(store.clone(), schema, &config.import).await?;

    let report = session.import_all(&vault.documents).await;
    for failure in &report.failures {
        output::warning(&format!("{}: {}", failure.path, failure.message));
    }

    println!("Import");
    output::stat("Imported", report.imported);
    output::stat("Updated", report.updated);
    output::stat("Failed", report.failed);
    output::stat("Properties written", report.properties_written);
    output::stat("Properties skipped", report.properties_skipped);

    if no_resolve {
        output::info("Reference resolution skipped");
    } else {
        let stats = session.resolve_references().await;
        println!("References");
        output::stat("Links found", stats.links_found);
        output::stat("Links resolved", stats.links_resolved);
        output::stat("Ambiguous", stats.ambiguous);
        output::stat("Records updated", stats.updated_records);
        if stats.failed_records > 0 {
            output::warning(&format!(
                "{} record(s) could not be rewritten with resolved references",
                stats.failed_records
            ));
        }
    }

    if let Some(path) = out {
        output::write_json(&path, &store.snapshot().await)?;
        output::success(&format!("Records written to {}", path.display()));
    }

    Ok(())
}
