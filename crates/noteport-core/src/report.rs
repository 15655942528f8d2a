//! Markdown scan report

use serde::Serialize;

use crate::error::SchemaError;
use crate::inference::VaultAnalysis;
use crate::schema::Schema;
use crate::slug::slugify;

/// Properties listed in the report
const REPORT_PROPERTY_LIMIT: usize = 20;

/// What the filesystem walk found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub total_files: usize,
    pub top_folders: Vec<String>,
}

/// Render the report for a scanned vault
///
/// Sections: counts, the schema JSON to paste into the target application,
/// the most common properties, and the follow-up steps.
pub fn render_scan_report(
    name: &str,
    scan: &ScanSummary,
    analysis: &VaultAnalysis,
    schema: &Schema,
) -> Result<String, SchemaError> {
    let schema_json = schema.to_json_pretty()?;

    let mut report = format!("# Vault Scan: {}\n\n", name);
    report.push_str(&format!(
        "**Files:** {} | **Sampled:** {} | **With properties:** {} | **Top folders:** {}\n\n",
        scan.total_files,
        analysis.sampled_documents,
        analysis.documents_with_properties,
        scan.top_folders.len()
    ));

    report.push_str("## Collection Schema\n\n");
    report.push_str("Copy this JSON to create the collection:\n\n");
    report.push_str(&format!("```json\n{}\n```\n\n", schema_json));

    report.push_str("## Properties Found\n\n");
    if analysis.properties.is_empty() {
        report.push_str("No document properties found.\n");
    }
    for property in analysis.properties.iter().take(REPORT_PROPERTY_LIMIT) {
        report.push_str(&format!(
            "- **{}** → `{}` ({}%, {})\n",
            property.key,
            slugify(&property.key),
            property.percentage,
            property.recommendation.field_type
        ));
    }

    report.push_str("\n## Next Steps\n\n");
    report.push_str("1. Create a new collection and open its code editor\n");
    report.push_str("2. Paste the JSON schema above and save the collection\n");
    report.push_str(&format!(
        "3. Run `noteport import <DIR> --schema <schema.json>` to import the {}s\n",
        schema.item_name.to_lowercase()
    ));

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::inference::TypeInferenceEngine;
    use crate::schema::build_schema;

    #[test]
    fn test_report_sections() {
        let docs = vec![
            Document::new("Projects/a.md", "---\nstatus: draft\n---\nbody"),
            Document::new("Projects/b.md", "---\nstatus: done\n---\nbody"),
            Document::new("c.md", "no header"),
        ];
        let analysis = TypeInferenceEngine::default().analyze(&docs);
        let folders = vec!["Projects".to_string()];
        let schema = build_schema("My Vault", &folders, &analysis.properties).unwrap();
        let scan = ScanSummary {
            total_files: 3,
            top_folders: folders,
        };

        let report = render_scan_report("My Vault", &scan, &analysis, &schema).unwrap();
        assert!(report.starts_with("# Vault Scan: My Vault\n"));
        assert!(report.contains("**Files:** 3"));
        assert!(report.contains("**With properties:** 2"));
        assert!(report.contains("```json\n{"));
        assert!(report.contains("- **status** → `status` (100%, text)"));
        assert!(report.contains("## Next Steps"));
    }

    #[test]
    fn test_report_without_properties() {
        let docs = vec![Document::new("a.md", "plain")];
        let analysis = TypeInferenceEngine::default().analyze(&docs);
        let schema = build_schema("Empty", &[], &analysis.properties).unwrap();

        let report =
            render_scan_report("Empty", &ScanSummary::default(), &analysis, &schema).unwrap();
        assert!(report.contains("No document properties found."));
    }
}
