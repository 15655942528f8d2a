//! Property value coercion
//!
//! Header values are written to schema fields through a fixed table keyed by
//! the target field type. A value the table cannot convert ends in
//! [`Coercion::NotApplicable`] and is never written.

use chrono::{Datelike, NaiveDate};
use noteport_parser::PropertyValue;
use serde::{Deserialize, Serialize};

use crate::inference::is_date_shaped;
use crate::schema::{FieldType, SchemaField};
use crate::slug::slugify;

/// Calendar date without time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateValue {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

/// A value ready to be written to a record field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Datetime(DateValue),
    Checkbox(bool),
    /// Id of the selected choice
    Choice(String),
}

/// Outcome of coercing one value
#[derive(Debug, Clone, PartialEq)]
pub enum Coercion {
    Write(FieldValue),
    NotApplicable,
}

impl Coercion {
    pub fn is_write(&self) -> bool {
        matches!(self, Coercion::Write(_))
    }
}

type CoerceFn = fn(&PropertyValue, &SchemaField) -> Option<FieldValue>;

/// One rule per field type
const COERCIONS: &[(FieldType, CoerceFn)] = &[
    (FieldType::Datetime, to_datetime),
    (FieldType::Number, to_number),
    (FieldType::Checkbox, to_checkbox),
    (FieldType::Choice, to_choice),
    (FieldType::Text, to_text),
];

/// Convert a header value for the given field
pub fn coerce(value: &PropertyValue, field: &SchemaField) -> Coercion {
    if value.is_blank() {
        return Coercion::NotApplicable;
    }

    COERCIONS
        .iter()
        .find(|(field_type, _)| *field_type == field.field_type)
        .and_then(|(_, rule)| rule(value, field))
        .map_or(Coercion::NotApplicable, Coercion::Write)
}

fn to_datetime(value: &PropertyValue, _field: &SchemaField) -> Option<FieldValue> {
    let text = value.as_str()?.trim();
    if !is_date_shaped(text) {
        return None;
    }
    let date = NaiveDate::parse_from_str(text.get(..10)?, "%Y-%m-%d").ok()?;
    Some(FieldValue::Datetime(date.into()))
}

fn to_number(value: &PropertyValue, _field: &SchemaField) -> Option<FieldValue> {
    let number = match value {
        PropertyValue::Number(n) => *n,
        PropertyValue::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(FieldValue::Number(number))
}

fn to_checkbox(value: &PropertyValue, _field: &SchemaField) -> Option<FieldValue> {
    match value {
        PropertyValue::Bool(b) => Some(FieldValue::Checkbox(*b)),
        PropertyValue::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" => Some(FieldValue::Checkbox(true)),
            "false" | "no" => Some(FieldValue::Checkbox(false)),
            _ => None,
        },
        _ => None,
    }
}

fn to_choice(value: &PropertyValue, field: &SchemaField) -> Option<FieldValue> {
    let text = match value {
        PropertyValue::String(s) => s.trim().to_string(),
        PropertyValue::Bool(_) | PropertyValue::Number(_) => value.to_string(),
        PropertyValue::List(_) | PropertyValue::Null => return None,
    };
    let slug = slugify(&text);

    field
        .choices
        .iter()
        .find(|choice| choice.id == slug || choice.label.eq_ignore_ascii_case(&text))
        .map(|choice| FieldValue::Choice(choice.id.clone()))
}

fn to_text(value: &PropertyValue, _field: &SchemaField) -> Option<FieldValue> {
    let text = match value {
        PropertyValue::List(items) => items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        PropertyValue::Null => return None,
        other => other.to_string(),
    };
    Some(FieldValue::Text(text))
}
