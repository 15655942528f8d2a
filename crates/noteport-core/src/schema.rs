//! Collection schema generation and validation
//!
//! The schema is the JSON document a structured record store needs to create
//! a collection: envelope metadata, one field per common property, a synthetic
//! `folder` choice field, and a table view plus (with folders) a board view.

use std::collections::HashSet;
use std::fmt;

use noteport_config::NoteportConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::SchemaError;
use crate::inference::PropertyRecommendation;
use crate::slug::slugify;

/// Id of the synthetic folder field
pub const FOLDER_FIELD_ID: &str = "folder";

/// Number of distinct choice colors
const CHOICE_COLORS: usize = 10;

/// View id prefix length
const VIEW_PREFIX_LEN: usize = 6;

// ============================================================================
// Field types
// ============================================================================

/// Semantic type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Datetime,
    Choice,
    Checkbox,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Datetime => "datetime",
            FieldType::Choice => "choice",
            FieldType::Checkbox => "checkbox",
        }
    }

    /// Default icon for fields of this type
    pub fn icon(&self) -> &'static str {
        match self {
            FieldType::Text => "ti-abc",
            FieldType::Number => "ti-123",
            FieldType::Datetime => "ti-clock",
            FieldType::Choice => "ti-tag",
            FieldType::Checkbox => "ti-square-check",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Schema document
// ============================================================================

/// One option of a choice field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    pub label: String,
    pub color: String,
    pub active: bool,
}

impl Choice {
    fn new(id: String, label: impl Into<String>, index: usize) -> Self {
        Self {
            id,
            label: label.into(),
            color: (index % CHOICE_COLORS).to_string(),
            active: true,
        }
    }
}

/// One collection field
///
/// `many`, `read_only` and `active` have no serde defaults: a schema file
/// that omits them is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub icon: String,
    pub many: bool,
    pub read_only: bool,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
}

impl SchemaField {
    pub fn new(id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field_type,
            icon: field_type.icon().to_string(),
            many: false,
            read_only: false,
            active: true,
            choices: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

/// View layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    Table,
    Board,
}

/// One collection view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaView {
    pub id: String,
    pub shown: bool,
    pub icon: String,
    pub label: String,
    pub description: String,
    #[serde(rename = "type")]
    pub view_type: ViewType,
    pub read_only: bool,
    pub field_ids: Vec<String>,
    #[serde(default)]
    pub group_by_field_id: Option<String>,
    #[serde(default = "default_sort_dir")]
    pub sort_dir: String,
    #[serde(default = "default_sort_field")]
    pub sort_field_id: String,
    pub opts: Map<String, Value>,
}

/// Which parts of the collection the host manages itself
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedFlags {
    pub fields: bool,
    pub views: bool,
    pub sidebar: bool,
}

/// A complete collection schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub ver: u32,
    pub version: String,
    pub name: String,
    pub icon: String,
    pub home: bool,
    pub item_name: String,
    pub description: String,
    pub page_field_ids: Vec<String>,
    pub show_sidebar_items: bool,
    pub show_cmdpal_items: bool,
    pub sidebar_record_sort_dir: String,
    pub sidebar_record_sort_field_id: String,
    #[serde(default)]
    pub managed: ManagedFlags,
    #[serde(default)]
    pub custom: Map<String, Value>,
    pub fields: Vec<SchemaField>,
    pub views: Vec<SchemaView>,
}

fn default_sort_dir() -> String {
    "asc".to_string()
}

fn default_sort_field() -> String {
    "title".to_string()
}

impl Schema {
    /// Parse and validate a schema document
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let schema: Schema = serde_json::from_str(json)?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn to_json_pretty(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn field(&self, id: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn field_ids(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.id.as_str()).collect()
    }

    /// Check the schema contract, failing on the first violation
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.ver != 1 {
            return Err(SchemaError::UnsupportedVersion(self.ver));
        }
        if self.name.trim().is_empty() {
            return Err(SchemaError::MissingName);
        }
        if self.item_name.trim().is_empty() {
            return Err(SchemaError::MissingItemName);
        }
        if !self.icon.starts_with("ti-") {
            return Err(SchemaError::InvalidIcon(self.icon.clone()));
        }

        let mut field_ids: HashSet<&str> = HashSet::new();
        for field in &self.fields {
            validate_field(field)?;
            if !field_ids.insert(field.id.as_str()) {
                return Err(SchemaError::DuplicateField(field.id.clone()));
            }
        }

        let mut view_ids: HashSet<&str> = HashSet::new();
        for view in &self.views {
            if view.id.is_empty() {
                return Err(SchemaError::MissingViewId);
            }
            if !view_ids.insert(view.id.as_str()) {
                return Err(SchemaError::DuplicateView(view.id.clone()));
            }
            if view.label.trim().is_empty() {
                return Err(SchemaError::MissingViewLabel(view.id.clone()));
            }
            if let Some(unknown) = view
                .field_ids
                .iter()
                .find(|id| !field_ids.contains(id.as_str()))
            {
                return Err(SchemaError::UnknownViewField {
                    view: view.id.clone(),
                    field: unknown.clone(),
                });
            }
        }

        Ok(())
    }
}

fn validate_field(field: &SchemaField) -> Result<(), SchemaError> {
    if field.id.is_empty() {
        return Err(SchemaError::MissingFieldId);
    }
    if field.label.trim().is_empty() {
        return Err(SchemaError::MissingFieldLabel(field.id.clone()));
    }
    if field.field_type != FieldType::Choice {
        return Ok(());
    }

    if field.choices.is_empty() {
        return Err(SchemaError::MissingChoices(field.id.clone()));
    }
    for choice in &field.choices {
        if choice.id.is_empty() {
            return Err(SchemaError::MissingChoiceId {
                field: field.id.clone(),
            });
        }
        if choice.label.is_empty() {
            return Err(SchemaError::MissingChoiceLabel {
                field: field.id.clone(),
                choice: choice.id.clone(),
            });
        }
        if choice.color.is_empty() {
            return Err(SchemaError::MissingChoiceColor {
                field: field.id.clone(),
                choice: choice.id.clone(),
            });
        }
    }
    Ok(())
}

// ============================================================================
// Builder
// ============================================================================

/// Builds a [`Schema`] from an analysis
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    item_name: String,
    icon: String,
    source_label: String,
    table_view_fields: usize,
    board_view_fields: usize,
    min_field_percentage: u32,
}

impl SchemaBuilder {
    /// Builder with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_config(name, &NoteportConfig::default())
    }

    pub fn from_config(name: impl Into<String>, config: &NoteportConfig) -> Self {
        Self {
            name: name.into(),
            item_name: config.schema.item_name.clone(),
            icon: config.schema.icon.clone(),
            source_label: config.schema.source_label.clone(),
            table_view_fields: config.schema.table_view_fields,
            board_view_fields: config.schema.board_view_fields,
            min_field_percentage: config.scan.min_field_percentage,
        }
    }

    /// Build and validate the schema
    ///
    /// Deterministic: the same folders and properties always produce the
    /// same document.
    pub fn build(
        &self,
        top_folders: &[String],
        properties: &[PropertyRecommendation],
    ) -> Result<Schema, SchemaError> {
        let mut fields: Vec<SchemaField> = Vec::new();

        if let Some(folder) = folder_field(top_folders) {
            fields.push(folder);
        }

        for property in properties {
            if property.percentage < self.min_field_percentage {
                continue;
            }

            let id = slugify(&property.key);
            if id.is_empty() {
                debug!(key = %property.key, "property has no identifier-safe characters");
                continue;
            }
            if id == FOLDER_FIELD_ID && fields.iter().any(|f| f.id == FOLDER_FIELD_ID) {
                warn!(key = %property.key, "property collides with the folder field, dropping it");
                continue;
            }

            fields.push(property_field(id, property));
        }

        let prefix = view_prefix(&self.name);
        let field_ids: Vec<String> = fields.iter().map(|f| f.id.clone()).collect();
        let has_folder = field_ids.iter().any(|id| id == FOLDER_FIELD_ID);

        let mut views = vec![SchemaView {
            id: format!("V{}001", prefix),
            shown: true,
            icon: String::new(),
            label: format!("All {}s", self.item_name),
            description: String::new(),
            view_type: ViewType::Table,
            read_only: false,
            field_ids: field_ids.iter().take(self.table_view_fields).cloned().collect(),
            group_by_field_id: None,
            sort_dir: default_sort_dir(),
            sort_field_id: default_sort_field(),
            opts: Map::new(),
        }];

        if has_folder {
            views.push(SchemaView {
                id: format!("V{}002", prefix),
                shown: true,
                icon: String::new(),
                label: "By Folder".to_string(),
                description: String::new(),
                view_type: ViewType::Board,
                read_only: false,
                field_ids: field_ids.iter().take(self.board_view_fields).cloned().collect(),
                group_by_field_id: Some(FOLDER_FIELD_ID.to_string()),
                sort_dir: default_sort_dir(),
                sort_field_id: default_sort_field(),
                opts: Map::new(),
            });
        }

        let first_field = field_ids
            .first()
            .cloned()
            .unwrap_or_else(|| FOLDER_FIELD_ID.to_string());

        let schema = Schema {
            ver: 1,
            version: "1.0.0".to_string(),
            name: self.name.clone(),
            icon: self.icon.clone(),
            home: false,
            item_name: self.item_name.clone(),
            description: format!("Imported from {}", self.source_label),
            page_field_ids: vec!["title".to_string(), first_field],
            show_sidebar_items: true,
            show_cmdpal_items: true,
            sidebar_record_sort_dir: default_sort_dir(),
            sidebar_record_sort_field_id: default_sort_field(),
            managed: ManagedFlags::default(),
            custom: Map::new(),
            fields,
            views,
        };

        schema.validate()?;
        debug!(
            fields = schema.fields.len(),
            views = schema.views.len(),
            "built valid schema"
        );
        Ok(schema)
    }
}

/// Build a schema with default settings
pub fn build_schema(
    name: &str,
    top_folders: &[String],
    properties: &[PropertyRecommendation],
) -> Result<Schema, SchemaError> {
    SchemaBuilder::new(name).build(top_folders, properties)
}

/// Choice field over the top-level folders
///
/// A folder whose name has no slug gets `folder_<index>`; repeated ids keep
/// the first folder.
fn folder_field(top_folders: &[String]) -> Option<SchemaField> {
    let mut choices: Vec<Choice> = Vec::new();
    for (index, folder) in top_folders.iter().enumerate() {
        let mut id = slugify(folder);
        if id.is_empty() {
            id = format!("{}_{}", FOLDER_FIELD_ID, index);
        }
        if choices.iter().any(|c| c.id == id) {
            debug!(folder = %folder, id = %id, "skipping folder with duplicate id");
            continue;
        }
        choices.push(Choice::new(id, folder.as_str(), index));
    }

    if choices.is_empty() {
        return None;
    }

    Some(
        SchemaField::new(FOLDER_FIELD_ID, "Folder", FieldType::Choice)
            .with_icon("ti-folder")
            .with_choices(choices),
    )
}

fn property_field(id: String, property: &PropertyRecommendation) -> SchemaField {
    let recommendation = &property.recommendation;
    if recommendation.field_type != FieldType::Choice {
        return SchemaField::new(id, property.key.as_str(), recommendation.field_type);
    }

    let mut choices: Vec<Choice> = Vec::new();
    for (index, value) in recommendation.choices.iter().enumerate() {
        let choice_id = slugify(value);
        if choice_id.is_empty() || choices.iter().any(|c| c.id == choice_id) {
            continue;
        }
        choices.push(Choice::new(choice_id, value.trim(), index));
    }

    if choices.len() < 2 {
        debug!(key = %property.key, "too few distinct choices, using text");
        return SchemaField::new(id, property.key.as_str(), FieldType::Text);
    }

    SchemaField::new(id, property.key.as_str(), FieldType::Choice).with_choices(choices)
}

fn view_prefix(name: &str) -> String {
    let prefix: String = slugify(name)
        .to_uppercase()
        .chars()
        .take(VIEW_PREFIX_LEN)
        .collect();
    if prefix.is_empty() {
        "VAULT".to_string()
    } else {
        prefix
    }
}
