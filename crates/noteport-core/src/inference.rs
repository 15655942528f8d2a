//! Property type inference
//!
//! Aggregates header properties over a (sampled) vault and recommends a
//! field type per property key. Sampling is a deterministic stride, so the
//! same document set always yields the same analysis.

use std::collections::{BTreeSet, HashMap};

use noteport_config::{ImportFormat, ScanConfig};
use noteport_parser::PropertyValue;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

use crate::document::Document;
use crate::schema::FieldType;

static DATE_PREFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("date prefix regex"));

static DIGITS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("digits regex"));

/// Key names that always hold dates, matched on the lowercased key or its slug
const WELL_KNOWN_DATE_KEYS: &[&str] = &[
    "created",
    "created_at",
    "created_date",
    "modified",
    "modified_at",
    "modified_date",
    "updated",
    "updated_at",
    "updated_date",
    "date",
    "date_at",
    "date_date",
];

/// Minimum and maximum distinct values for a string property to become a choice
const CHOICE_DISTINCT_RANGE: std::ops::RangeInclusive<usize> = 2..=10;

/// Samples needed before distinct strings are treated as a choice set
const CHOICE_MIN_SAMPLES: usize = 5;

/// Coarse kind of one observed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Array,
    Null,
    Boolean,
    Number,
    Date,
    NumberString,
    String,
}

impl ValueKind {
    pub fn of(value: &PropertyValue) -> Self {
        match value {
            PropertyValue::List(_) => ValueKind::Array,
            PropertyValue::Null => ValueKind::Null,
            PropertyValue::Bool(_) => ValueKind::Boolean,
            PropertyValue::Number(_) => ValueKind::Number,
            PropertyValue::String(s) if is_date_shaped(s) => ValueKind::Date,
            PropertyValue::String(s) if DIGITS_REGEX.is_match(s) => ValueKind::NumberString,
            PropertyValue::String(_) => ValueKind::String,
        }
    }
}

/// `YYYY-MM-DD` prefix, without checking that the date exists
pub fn is_date_shaped(value: &str) -> bool {
    DATE_PREFIX_REGEX.is_match(value)
}

/// Whether a property key conventionally holds a date
pub fn is_well_known_date_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    let slug = crate::slug::slugify(key);
    WELL_KNOWN_DATE_KEYS
        .iter()
        .any(|known| *known == lower || *known == slug)
}

/// Aggregated observations for one property key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyStat {
    pub key: String,
    pub count: usize,
    pub kinds: BTreeSet<ValueKind>,
    pub samples: Vec<PropertyValue>,
}

impl PropertyStat {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            count: 0,
            kinds: BTreeSet::new(),
            samples: Vec::new(),
        }
    }

    fn observe(&mut self, value: &PropertyValue, example_limit: usize) {
        self.count += 1;
        self.kinds.insert(ValueKind::of(value));
        if self.samples.len() < example_limit {
            self.samples.push(value.clone());
        }
    }
}

/// Recommended field type for one property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRecommendation {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub note: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl FieldRecommendation {
    fn new(field_type: FieldType, note: impl Into<String>) -> Self {
        Self {
            field_type,
            note: note.into(),
            choices: Vec::new(),
        }
    }

    fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }
}

/// Recommend a field type from the kinds and samples seen for one key
///
/// Rules are tried in order and the first match wins:
/// 1. any list value → text (lists are written comma-joined)
/// 2. any date-shaped string → datetime
/// 3. more than half of the string samples date-shaped → datetime
/// 4. only numbers or digit strings → number
/// 5. any boolean → choice of `true` / `false`
/// 6. 2 to 10 distinct trimmed strings over at least 5 samples → choice
/// 7. text
pub fn recommend_field_type(
    kinds: &BTreeSet<ValueKind>,
    samples: &[PropertyValue],
) -> FieldRecommendation {
    if kinds.contains(&ValueKind::Array) {
        return FieldRecommendation::new(FieldType::Text, "Arrays become comma-joined text");
    }

    if kinds.contains(&ValueKind::Date) {
        return FieldRecommendation::new(FieldType::Datetime, "Date field");
    }

    if kinds.contains(&ValueKind::String) {
        let date_count = samples
            .iter()
            .filter_map(PropertyValue::as_str)
            .filter(|s| is_date_shaped(s))
            .count();
        if date_count * 2 > samples.len() {
            return FieldRecommendation::new(FieldType::Datetime, "Date field (inferred from samples)");
        }
    }

    if !kinds.is_empty()
        && kinds
            .iter()
            .all(|kind| matches!(kind, ValueKind::Number | ValueKind::NumberString))
    {
        return FieldRecommendation::new(FieldType::Number, "Numeric");
    }

    if kinds.contains(&ValueKind::Boolean) {
        return FieldRecommendation::new(FieldType::Choice, "Boolean as choice")
            .with_choices(vec!["true".to_string(), "false".to_string()]);
    }

    if kinds.contains(&ValueKind::String) {
        let mut distinct: Vec<String> = Vec::new();
        for value in samples.iter().filter_map(PropertyValue::as_str) {
            let trimmed = value.trim();
            if !trimmed.is_empty() && !distinct.iter().any(|d| d == trimmed) {
                distinct.push(trimmed.to_string());
            }
        }

        if CHOICE_DISTINCT_RANGE.contains(&distinct.len()) && samples.len() >= CHOICE_MIN_SAMPLES {
            let note = format!("{} options", distinct.len());
            return FieldRecommendation::new(FieldType::Choice, note).with_choices(distinct);
        }
    }

    FieldRecommendation::new(FieldType::Text, "Text field")
}

/// Analysis result for one property key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyRecommendation {
    pub key: String,
    pub count: usize,
    /// Share of documents with any properties, rounded to a whole percent
    pub percentage: u32,
    pub kinds: BTreeSet<ValueKind>,
    pub examples: Vec<PropertyValue>,
    pub recommendation: FieldRecommendation,
}

/// Result of analyzing a vault
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VaultAnalysis {
    pub total_documents: usize,
    pub sampled_documents: usize,
    pub documents_with_properties: usize,
    /// Ordered by occurrence count, most frequent first
    pub properties: Vec<PropertyRecommendation>,
}

impl VaultAnalysis {
    pub fn property(&self, key: &str) -> Option<&PropertyRecommendation> {
        self.properties.iter().find(|p| p.key == key)
    }
}

/// Infers field types from document headers
#[derive(Debug, Clone)]
pub struct TypeInferenceEngine {
    sample_limit: usize,
    example_limit: usize,
    format: ImportFormat,
}

impl Default for TypeInferenceEngine {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

impl TypeInferenceEngine {
    pub fn new(sample_limit: usize, example_limit: usize) -> Self {
        Self {
            sample_limit: sample_limit.max(1),
            example_limit,
            format: ImportFormat::Auto,
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.sample_limit, config.example_limit)
    }

    /// Header syntax used when parsing documents
    #[must_use]
    pub fn with_format(mut self, format: ImportFormat) -> Self {
        self.format = format;
        self
    }

    /// Analyze the headers of a document set
    pub fn analyze(&self, documents: &[Document]) -> VaultAnalysis {
        let mut stats: Vec<PropertyStat> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut sampled = 0;
        let mut with_properties = 0;

        for index in sample_indices(documents.len(), self.sample_limit) {
            let document = &documents[index];
            sampled += 1;

            let header = document.parse_header(self.format);
            if header.properties.is_empty() {
                continue;
            }
            with_properties += 1;

            for (key, value) in header.properties.iter() {
                let position = *positions.entry(key.to_string()).or_insert_with(|| {
                    stats.push(PropertyStat::new(key));
                    stats.len() - 1
                });
                stats[position].observe(value, self.example_limit);
            }
        }

        // stable: equal counts keep first-seen order
        stats.sort_by(|a, b| b.count.cmp(&a.count));

        let properties = stats
            .into_iter()
            .map(|stat| recommend_property(stat, with_properties))
            .collect();

        debug!(
            total = documents.len(),
            sampled, with_properties, "analyzed vault properties"
        );

        VaultAnalysis {
            total_documents: documents.len(),
            sampled_documents: sampled,
            documents_with_properties: with_properties,
            properties,
        }
    }
}

fn recommend_property(stat: PropertyStat, with_properties: usize) -> PropertyRecommendation {
    let mut recommendation = recommend_field_type(&stat.kinds, &stat.samples);

    if is_well_known_date_key(&stat.key)
        && matches!(recommendation.field_type, FieldType::Text | FieldType::Choice)
    {
        debug!(key = %stat.key, "forcing well-known date key to datetime");
        recommendation = FieldRecommendation::new(FieldType::Datetime, "Common date field");
    }

    PropertyRecommendation {
        percentage: percentage(stat.count, with_properties),
        key: stat.key,
        count: stat.count,
        kinds: stat.kinds,
        examples: stat.samples,
        recommendation,
    }
}

fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}

/// Indices visited when sampling `len` documents down to at most `limit`
///
/// The stride is `ceil(len / min(len, limit))`, so small sets are read in full.
pub fn sample_indices(len: usize, limit: usize) -> impl Iterator<Item = usize> {
    let sample_size = len.min(limit.max(1));
    let step = if sample_size == 0 {
        1
    } else {
        len.div_ceil(sample_size)
    };
    (0..len).step_by(step)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(list: &[ValueKind]) -> BTreeSet<ValueKind> {
        list.iter().copied().collect()
    }

    fn strings(values: &[&str]) -> Vec<PropertyValue> {
        values.iter().map(|v| PropertyValue::from(*v)).collect()
    }

    #[test]
    fn test_value_kinds() {
        assert_eq!(ValueKind::of(&PropertyValue::List(vec![])), ValueKind::Array);
        assert_eq!(ValueKind::of(&PropertyValue::Null), ValueKind::Null);
        assert_eq!(ValueKind::of(&PropertyValue::Bool(true)), ValueKind::Boolean);
        assert_eq!(ValueKind::of(&PropertyValue::Number(1.5)), ValueKind::Number);
        assert_eq!(ValueKind::of(&"2024-01-15T10:00".into()), ValueKind::Date);
        assert_eq!(ValueKind::of(&"42".into()), ValueKind::NumberString);
        assert_eq!(ValueKind::of(&"4.2".into()), ValueKind::String);
    }

    #[test]
    fn test_array_wins_over_everything() {
        let rec = recommend_field_type(&kinds(&[ValueKind::Array, ValueKind::Date]), &[]);
        assert_eq!(rec.field_type, FieldType::Text);
    }

    #[test]
    fn test_date_kind_is_datetime() {
        let rec = recommend_field_type(&kinds(&[ValueKind::Date, ValueKind::String]), &[]);
        assert_eq!(rec.field_type, FieldType::Datetime);
    }

    #[test]
    fn test_number_and_number_string_is_number() {
        let rec = recommend_field_type(&kinds(&[ValueKind::Number, ValueKind::NumberString]), &[]);
        assert_eq!(rec.field_type, FieldType::Number);
        let rec = recommend_field_type(&kinds(&[ValueKind::NumberString]), &strings(&["1", "2"]));
        assert_eq!(rec.field_type, FieldType::Number);
    }

    #[test]
    fn test_boolean_becomes_two_choices() {
        let rec = recommend_field_type(&kinds(&[ValueKind::Boolean]), &[]);
        assert_eq!(rec.field_type, FieldType::Choice);
        assert_eq!(rec.choices, vec!["true", "false"]);
    }

    #[test]
    fn test_low_cardinality_strings_become_choice() {
        let samples = strings(&["todo", "done ", "todo", " doing", "done", "todo"]);
        let rec = recommend_field_type(&kinds(&[ValueKind::String]), &samples);
        assert_eq!(rec.field_type, FieldType::Choice);
        assert_eq!(rec.choices, vec!["todo", "done", "doing"]);
    }

    #[test]
    fn test_too_few_samples_stay_text() {
        let samples = strings(&["a", "b", "a", "b"]);
        let rec = recommend_field_type(&kinds(&[ValueKind::String]), &samples);
        assert_eq!(rec.field_type, FieldType::Text);
    }

    #[test]
    fn test_single_distinct_value_stays_text() {
        let samples = strings(&["same"; 6]);
        let rec = recommend_field_type(&kinds(&[ValueKind::String]), &samples);
        assert_eq!(rec.field_type, FieldType::Text);
    }

    #[test]
    fn test_well_known_date_keys() {
        assert!(is_well_known_date_key("Created"));
        assert!(is_well_known_date_key("updated_at"));
        assert!(is_well_known_date_key("Modified Date"));
        assert!(is_well_known_date_key("date"));
        assert!(!is_well_known_date_key("deadline"));
    }

    #[test]
    fn test_sample_indices() {
        assert_eq!(sample_indices(3, 500).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(sample_indices(0, 500).count(), 0);
        // ceil(1001 / 500) = 3
        let picked: Vec<usize> = sample_indices(1001, 500).collect();
        assert_eq!(picked[..3], [0, 3, 6]);
        assert_eq!(picked.len(), 334);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 40), 3);
        assert_eq!(percentage(0, 0), 0);
    }
}
