//! Nested-field codec.
//!
//! Converts between flat rows of string cells keyed by dot-notation column
//! names and strongly typed records. Decoding never fails on numeric input:
//! empty or malformed numbers become 0. Enumerations and dates are strict.
//!
//! `decode(encode(e)) == e` holds for every record whose text fields carry
//! no surrounding whitespace and whose tags contain no commas.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use estate_core::models::{Entity, Level};
use serde_json::{Map, Value};

use crate::error::{HierarchyError, Violation, ViolationKind};
use crate::schema::{FieldKind, FieldSpec, schema};

/// One flat row: column name → cell text.
pub type RawRow = BTreeMap<String, String>;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Decode a flat row into a record of the given level.
///
/// Columns missing from the row keep the level's defaults; columns the
/// schema does not know are ignored.
pub fn decode(level: Level, row: &RawRow) -> Result<Entity, Violation> {
    let schema = schema(level);
    let mut root = Map::new();

    for field in schema.fields {
        let Some(raw) = row.get(field.path) else {
            continue;
        };
        if raw.trim().is_empty() && schema.optional_group_of(field.path).is_some() {
            continue;
        }
        if let Some(value) = coerce(field, raw)? {
            insert_path(&mut root, field.path, value);
        }
    }

    Entity::from_value(level, Value::Object(root)).map_err(|e| {
        Violation::new(
            ViolationKind::MalformedValue,
            None,
            format!("row does not form a valid {level}: {e}"),
        )
    })
}

/// Flatten a record into a row with one cell per schema column.
pub fn encode(entity: &Entity) -> Result<RawRow, HierarchyError> {
    let value = entity.to_value()?;
    Ok(schema(entity.level())
        .fields
        .iter()
        .map(|field| {
            let cell = render(field, lookup(&value, field.path));
            (field.path.to_string(), cell)
        })
        .collect())
}

/// One example row whose columns are the level's full flattened schema.
pub fn template_row(level: Level) -> RawRow {
    schema(level)
        .fields
        .iter()
        .map(|f| (f.path.to_string(), f.example.to_string()))
        .collect()
}

fn coerce(field: &FieldSpec, raw: &str) -> Result<Option<Value>, Violation> {
    let raw = raw.trim();
    let value = match field.kind {
        FieldKind::Text => Value::String(raw.to_string()),
        FieldKind::Integer => Value::from(raw.parse::<u32>().unwrap_or(0)),
        FieldKind::Float => Value::from(
            raw.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .unwrap_or(0.0),
        ),
        FieldKind::Bool => Value::Bool(raw.eq_ignore_ascii_case("true")),
        FieldKind::Tags => Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(|tag| Value::String(tag.to_string()))
                .collect(),
        ),
        FieldKind::Enum(tokens) => {
            if raw.is_empty() {
                return Ok(None);
            }
            let token = raw.to_ascii_lowercase();
            if !tokens.contains(&token.as_str()) {
                return Err(Violation::new(
                    ViolationKind::InvalidEnum,
                    Some(field.path),
                    format!(
                        "{} must be one of {}, got '{raw}'",
                        field.path,
                        tokens.join(", ")
                    ),
                ));
            }
            Value::String(token)
        }
        FieldKind::Date => {
            if raw.is_empty() {
                return Ok(None);
            }
            let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                Violation::new(
                    ViolationKind::MalformedValue,
                    Some(field.path),
                    format!("{} must be a YYYY-MM-DD date, got '{raw}'", field.path),
                )
            })?;
            Value::String(date.format(DATE_FORMAT).to_string())
        }
    };
    Ok(Some(value))
}

fn insert_path(root: &mut Map<String, Value>, path: &str, value: Value) {
    let mut segments = path.split('.').peekable();
    let mut current = root;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return;
        }
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(next) = slot else {
            return;
        };
        current = next;
    }
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, segment| current.get(segment))
}

fn render(field: &FieldSpec, value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Object(_)) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => match field.kind {
            FieldKind::Float => n.as_f64().map(|f| f.to_string()).unwrap_or_default(),
            _ => n.to_string(),
        },
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(","),
    }
}
