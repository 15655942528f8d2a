//! Noteport Core
//!
//! Vault analysis and import pipeline:
//! - [`TypeInferenceEngine`] samples documents and recommends a field type per property
//! - [`SchemaBuilder`] turns the analysis into a validated collection [`Schema`]
//! - [`ImportSession`] writes one record per document (Phase 1) and then
//!   resolves wikilinks and block references across records (Phase 2)
//!
//! Records are written through the async [`RecordStore`] seam;
//! [`MemoryRecordStore`] is the in-process implementation.

pub mod coerce;
pub mod document;
pub mod error;
pub mod inference;
pub mod report;
pub mod resolver;
pub mod schema;
pub mod session;
pub mod slug;
pub mod store;

pub use coerce::{coerce, Coercion, DateValue, FieldValue};
pub use document::Document;
pub use error::{DocumentError, SchemaError, StoreError, StoreResult};
pub use inference::{
    recommend_field_type, FieldRecommendation, PropertyRecommendation, TypeInferenceEngine,
    ValueKind, VaultAnalysis,
};
pub use report::{render_scan_report, ScanSummary};
pub use resolver::{
    Disambiguator, FirstCandidate, ImportedRecord, ReferenceIndex, ReferenceResolver,
    ResolutionStats,
};
pub use schema::{
    build_schema, Choice, FieldType, Schema, SchemaBuilder, SchemaField, SchemaView, ViewType,
    FOLDER_FIELD_ID,
};
pub use session::{DocumentOutcome, ImportAction, ImportFailure, ImportReport, ImportSession};
pub use slug::{field_variations, slugify};
pub use store::{MemoryRecordStore, RecordId, RecordStore, RecordSummary, StoredRecord};

// Parser types that appear in this crate's public API
pub use noteport_parser::{Block, BlockKind, PropertyMap, PropertyValue, Segment};
