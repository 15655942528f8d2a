//! Two-phase import session
//!
//! Phase 1 ([`ImportSession::import_document`]) creates or updates one record
//! per document with unresolved wikilink placeholders. Phase 2
//! ([`ImportSession::resolve_references`]) runs once every record exists and
//! only rewrites records whose segments changed.
//!
//! The session owns the duplicate-detection index (lowercased title to record
//! id) and the records imported so far, so Phase 1 can be resumed document by
//! document and Phase 2 can be re-run.

use std::collections::HashMap;

use noteport_config::ImportConfig;
use noteport_parser::{Block, BlockParser, PropertyMap};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::coerce::{coerce, Coercion};
use crate::document::Document;
use crate::error::{DocumentError, StoreError};
use crate::resolver::{
    Disambiguator, FirstCandidate, ImportedRecord, ReferenceIndex, ReferenceResolver,
    ResolutionStats,
};
use crate::schema::{Schema, SchemaField, FOLDER_FIELD_ID};
use crate::slug::field_variations;
use crate::store::{RecordId, RecordStore};

/// Whether a document created a record or updated an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportAction {
    Created,
    Updated,
}

/// Result of importing one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentOutcome {
    pub record_id: RecordId,
    pub action: ImportAction,
    pub properties_written: usize,
    pub properties_skipped: usize,
    pub blocks: usize,
}

/// A document that failed to import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFailure {
    pub path: String,
    pub message: String,
}

/// Aggregated Phase 1 counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub updated: usize,
    pub failed: usize,
    pub properties_written: usize,
    pub properties_skipped: usize,
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn record(&mut self, result: Result<DocumentOutcome, DocumentError>) {
        match result {
            Ok(outcome) => {
                match outcome.action {
                    ImportAction::Created => self.imported += 1,
                    ImportAction::Updated => self.updated += 1,
                }
                self.properties_written += outcome.properties_written;
                self.properties_skipped += outcome.properties_skipped;
            }
            Err(err) => {
                self.failed += 1;
                self.failures.push(ImportFailure {
                    path: err.path.clone(),
                    message: err.source.to_string(),
                });
            }
        }
    }

    pub fn total(&self) -> usize {
        self.imported + self.updated + self.failed
    }
}

/// State threaded through both import phases
pub struct ImportSession<S: RecordStore> {
    store: S,
    schema: Schema,
    config: ImportConfig,
    parser: BlockParser,
    by_title: HashMap<String, RecordId>,
    records: Vec<ImportedRecord>,
}

impl<S: RecordStore> ImportSession<S> {
    /// Start a session, indexing the records already in the store
    pub async fn begin(store: S, schema: Schema, config: &ImportConfig) -> Result<Self, StoreError> {
        let mut by_title = HashMap::new();
        for existing in store.list_records().await? {
            let key = existing.title.to_lowercase();
            if !key.is_empty() {
                by_title.entry(key).or_insert(existing.id);
            }
        }
        debug!(existing = by_title.len(), "indexed existing records");

        Ok(Self {
            store,
            schema,
            config: config.clone(),
            parser: BlockParser::new(),
            by_title,
            records: Vec::new(),
        })
    }

    /// Override the configured heading separator policy
    #[must_use]
    pub fn with_heading_separators(mut self, enabled: bool) -> Self {
        self.config.heading_separators = enabled;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Records written by this session, in first-import order
    pub fn records(&self) -> &[ImportedRecord] {
        &self.records
    }

    /// Phase 1 for one document
    ///
    /// A document whose base name matches an existing record (case-insensitive)
    /// replaces that record's content; otherwise a new record is created. The
    /// record is indexed immediately so later documents with the same name
    /// update it.
    pub async fn import_document(&mut self, document: &Document) -> Result<DocumentOutcome, DocumentError> {
        let fail = |source: StoreError| DocumentError::new(document.path.as_str(), source);

        let header = document.parse_header(self.config.format);
        let key = document.base_name.to_lowercase();

        let (record_id, action) = match self.by_title.get(&key) {
            Some(id) => {
                let id = id.clone();
                self.store.clear_blocks(&id).await.map_err(fail)?;
                (id, ImportAction::Updated)
            }
            None => {
                let id = self
                    .store
                    .create_record(&document.base_name)
                    .await
                    .map_err(fail)?;
                self.by_title.insert(key, id.clone());
                (id, ImportAction::Created)
            }
        };

        // Registered before any content write so Phase 2 can still link to
        // the record when a later write fails.
        let slot = self.register(ImportedRecord {
            id: record_id.clone(),
            title: document.base_name.clone(),
            path: document.path.clone(),
            blocks: Vec::new(),
            block_ids: header.block_ids,
        });

        self.write_folder(&record_id, document).await.map_err(fail)?;
        let (written, skipped) = self
            .write_properties(&record_id, &header.properties)
            .await
            .map_err(fail)?;

        let blocks = self.body_blocks(&header.body);
        if !blocks.is_empty() {
            self.store
                .append_blocks(&record_id, &blocks)
                .await
                .map_err(fail)?;
        }

        let outcome = DocumentOutcome {
            record_id,
            action,
            properties_written: written,
            properties_skipped: skipped,
            blocks: blocks.len(),
        };
        self.records[slot].blocks = blocks;

        debug!(
            path = %document.path,
            action = ?outcome.action,
            written,
            skipped,
            "imported document"
        );
        Ok(outcome)
    }

    /// Phase 1 over a document set, continuing past failures
    pub async fn import_all(&mut self, documents: &[Document]) -> ImportReport {
        let mut report = ImportReport::default();
        for document in documents {
            let result = self.import_document(document).await;
            if let Err(err) = &result {
                warn!(path = %err.path, error = %err.source, "document import failed");
            }
            report.record(result);
        }
        info!(
            imported = report.imported,
            updated = report.updated,
            failed = report.failed,
            "import phase complete"
        );
        report
    }

    /// Phase 2 with the default first-candidate disambiguation
    pub async fn resolve_references(&mut self) -> ResolutionStats {
        self.resolve_references_with(Box::new(FirstCandidate)).await
    }

    /// Phase 2: resolve references across every record of the session
    ///
    /// Records whose segments changed are rewritten (blocks cleared, then
    /// appended again). The session keeps the unresolved blocks of a record
    /// until its rewrite succeeds, so a failed pass can simply be re-run.
    pub async fn resolve_references_with(&mut self, disambiguator: Box<dyn Disambiguator>) -> ResolutionStats {
        let resolver = ReferenceResolver::new(ReferenceIndex::from_records(&self.records))
            .with_disambiguator(disambiguator);

        let mut stats = ResolutionStats::default();
        for record in self.records.iter_mut() {
            let mut resolved = record.blocks.clone();
            if !resolver.resolve_blocks(&mut resolved, &mut stats) {
                continue;
            }

            if let Err(err) = rewrite_blocks(&self.store, &record.id, &resolved).await {
                warn!(record = %record.id, path = %record.path, error = %err, "reference rewrite failed");
                stats.failed_records += 1;
                continue;
            }
            record.blocks = resolved;
            stats.updated_records += 1;
        }

        info!(
            found = stats.links_found,
            resolved = stats.links_resolved,
            ambiguous = stats.ambiguous,
            updated = stats.updated_records,
            failed = stats.failed_records,
            "reference resolution complete"
        );
        stats
    }

    /// Add a record to the session, replacing an earlier entry with the same id
    fn register(&mut self, record: ImportedRecord) -> usize {
        match self.records.iter().position(|r| r.id == record.id) {
            Some(index) => {
                self.records[index] = record;
                index
            }
            None => {
                self.records.push(record);
                self.records.len() - 1
            }
        }
    }

    async fn write_folder(&self, record_id: &str, document: &Document) -> Result<(), StoreError> {
        let Some(field) = self.schema.field(FOLDER_FIELD_ID) else {
            return Ok(());
        };
        let folder = document
            .top_folder()
            .unwrap_or(self.config.root_folder_label.as_str());

        match coerce(&folder.into(), field) {
            Coercion::Write(value) => self.store.set_property(record_id, &field.id, value).await,
            Coercion::NotApplicable => {
                debug!(path = %document.path, folder, "folder is not a folder choice");
                Ok(())
            }
        }
    }

    /// Write header properties, returning (written, skipped)
    async fn write_properties(
        &self,
        record_id: &str,
        properties: &PropertyMap,
    ) -> Result<(usize, usize), StoreError> {
        let mut written = 0;
        let mut skipped = 0;

        for (key, value) in properties.iter() {
            if value.is_blank() {
                continue;
            }

            let Some(field) = self.match_field(key) else {
                debug!(key, "no field for property");
                skipped += 1;
                continue;
            };

            match coerce(value, field) {
                Coercion::Write(coerced) => {
                    self.store.set_property(record_id, &field.id, coerced).await?;
                    written += 1;
                }
                Coercion::NotApplicable => {
                    debug!(key, field = %field.id, "value does not fit field type");
                    skipped += 1;
                }
            }
        }

        Ok((written, skipped))
    }

    fn match_field(&self, key: &str) -> Option<&SchemaField> {
        field_variations(key)
            .iter()
            .find_map(|candidate| self.schema.field(candidate))
    }

    fn body_blocks(&self, body: &str) -> Vec<Block> {
        let parsed = self.parser.parse(body);
        if !self.config.heading_separators {
            return parsed;
        }
        with_heading_separators(parsed)
    }
}

async fn rewrite_blocks<S: RecordStore>(store: &S, record_id: &str, blocks: &[Block]) -> Result<(), StoreError> {
    store.clear_blocks(record_id).await?;
    store.append_blocks(record_id, blocks).await
}

/// Insert one empty separator block before every heading except the first block
pub fn with_heading_separators(blocks: Vec<Block>) -> Vec<Block> {
    let mut output = Vec::with_capacity(blocks.len());
    for block in blocks {
        if block.is_heading() && !output.is_empty() {
            output.push(Block::separator());
        }
        output.push(block);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use noteport_parser::{parse_document_body, BlockKind};

    #[test]
    fn test_separators_before_non_first_headings() {
        let blocks = with_heading_separators(parse_document_body("# One\ntext\n## Two\n## Three"));
        let kinds: Vec<BlockKind> = blocks.iter().map(Block::kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Heading,
                BlockKind::Text,
                BlockKind::Text,
                BlockKind::Heading,
                BlockKind::Text,
                BlockKind::Heading,
            ]
        );
        assert_eq!(blocks[2], Block::separator());
    }

    #[test]
    fn test_no_separator_before_leading_heading() {
        let blocks = with_heading_separators(parse_document_body("# Only"));
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_report_aggregation() {
        let mut report = ImportReport::default();
        report.record(Ok(DocumentOutcome {
            record_id: "rec-0001".into(),
            action: ImportAction::Created,
            properties_written: 2,
            properties_skipped: 1,
            blocks: 3,
        }));
        report.record(Err(DocumentError::new("b.md", StoreError::backend("boom"))));

        assert_eq!(report.imported, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.properties_written, 2);
        assert_eq!(report.total(), 2);
        assert_eq!(report.failures[0].path, "b.md");
    }
}
