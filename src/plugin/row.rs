//! Projection of raw API objects into typed rows.
//!
//! Each column pulls its value out of the raw JSON object through a
//! dot-separated path (`author.username`), then either coerces it to the
//! declared column type or hands it to a custom transform.

use crate::error::{Error, Result};
use crate::plugin::quals::{KeyColumnQuals, QualValue};
use crate::plugin::table::{Column, ColumnType, Table, Transform};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use serde_json::Value;

/// A single typed cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Int(i64),
    String(String),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Json(Value),
}

impl Cell {
    /// Whether this cell satisfies an `=` qual.
    pub fn matches(&self, qual: &QualValue) -> bool {
        match (self, qual) {
            (Cell::Int(a), QualValue::Int(b)) => a == b,
            (Cell::String(a), QualValue::String(b)) => a == b,
            (Cell::Bool(a), QualValue::Bool(b)) => a == b,
            _ => false,
        }
    }
}

/// Row of cells in column declaration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<(&'static str, Cell)>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, cell)| cell)
    }

    /// True when every qual is satisfied by the corresponding cell.
    pub fn matches(&self, quals: &KeyColumnQuals) -> bool {
        quals
            .iter()
            .all(|(column, qual)| self.get(column).is_some_and(|cell| cell.matches(qual)))
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, cell) in &self.cells {
            map.serialize_entry(name, cell)?;
        }
        map.end()
    }
}

/// Looks up a dot-separated path. Missing keys and non-object parents yield `Null`.
pub fn extract_by_path<'v>(item: &'v Value, path: &str) -> &'v Value {
    static NULL: Value = Value::Null;
    path.split('.')
        .filter(|part| !part.is_empty())
        .try_fold(item, |current, part| current.as_object()?.get(part))
        .unwrap_or(&NULL)
}

/// Coerces a raw JSON value to the declared column type.
pub fn coerce(column_type: ColumnType, value: &Value) -> std::result::Result<Cell, String> {
    if value.is_null() {
        return Ok(Cell::Null);
    }
    match column_type {
        ColumnType::Int => value
            .as_i64()
            .map(Cell::Int)
            .ok_or_else(|| format!("expected an integer, got {value}")),
        ColumnType::Bool => value
            .as_bool()
            .map(Cell::Bool)
            .ok_or_else(|| format!("expected a boolean, got {value}")),
        ColumnType::String => Ok(match value {
            Value::String(s) => Cell::String(s.clone()),
            other => Cell::String(other.to_string()),
        }),
        ColumnType::Timestamp => {
            let raw = value
                .as_str()
                .ok_or_else(|| format!("expected a timestamp string, got {value}"))?;
            if raw.is_empty() {
                return Ok(Cell::Null);
            }
            DateTime::parse_from_rfc3339(raw)
                .map(|ts| Cell::Timestamp(ts.with_timezone(&Utc)))
                .map_err(|e| format!("invalid timestamp '{raw}': {e}"))
        }
        ColumnType::Json => Ok(Cell::Json(value.clone())),
    }
}

fn project_cell(column: &Column, item: &Value, quals: &KeyColumnQuals) -> Result<Cell> {
    let cell = match column.transform {
        Transform::FromField(path) => coerce(column.column_type, extract_by_path(item, path)),
        Transform::FromFieldWith(path, transform) => transform(extract_by_path(item, path)),
        Transform::FromQual(name) => Ok(quals
            .get(name)
            .map(|qual| match qual {
                QualValue::Int(i) => Cell::Int(*i),
                QualValue::String(s) => Cell::String(s.clone()),
                QualValue::Bool(b) => Cell::Bool(*b),
            })
            .unwrap_or(Cell::Null)),
    };
    cell.map_err(|message| Error::transform(column.name, message))
}

/// Projects one raw API object into a row using the table's column bindings.
pub fn project_row(table: &Table, item: &Value, quals: &KeyColumnQuals) -> Result<Row> {
    let cells = table
        .columns
        .iter()
        .map(|column| Ok((column.name, project_cell(column, item, quals)?)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Row { cells })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn extract_nested_path() {
        let item = json!({"author": {"id": 3, "username": "alice"}});
        assert_eq!(extract_by_path(&item, "author.username"), &json!("alice"));
        assert_eq!(extract_by_path(&item, "author.id"), &json!(3));
    }

    #[test]
    fn extract_missing_path_is_null() {
        let item = json!({"owner": null, "name": "demo"});
        assert!(extract_by_path(&item, "owner.id").is_null());
        assert!(extract_by_path(&item, "missing").is_null());
        assert!(extract_by_path(&item, "name.inner").is_null());
    }

    #[test]
    fn coerce_scalar_types() {
        assert_eq!(coerce(ColumnType::Int, &json!(5)).unwrap(), Cell::Int(5));
        assert_eq!(coerce(ColumnType::Bool, &json!(true)).unwrap(), Cell::Bool(true));
        assert_eq!(
            coerce(ColumnType::String, &json!("x")).unwrap(),
            Cell::String("x".to_string())
        );
        assert_eq!(coerce(ColumnType::Int, &Value::Null).unwrap(), Cell::Null);
        assert!(coerce(ColumnType::Int, &json!("five")).is_err());
    }

    #[test]
    fn coerce_timestamp() {
        let cell = coerce(ColumnType::Timestamp, &json!("2024-03-01T12:30:00.000Z")).unwrap();
        assert_eq!(
            cell,
            Cell::Timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap())
        );
        assert!(coerce(ColumnType::Timestamp, &json!("not a time")).is_err());
    }

    #[test]
    fn row_serializes_in_column_order() {
        let row = Row {
            cells: vec![
                ("id", Cell::Int(1)),
                ("title", Cell::String("Bug".to_string())),
                ("closed_at", Cell::Null),
            ],
        };
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"id":1,"title":"Bug","closed_at":null}"#
        );
    }

    #[test]
    fn row_matches_quals() {
        let row = Row {
            cells: vec![("id", Cell::Int(1)), ("author", Cell::String("bob".to_string()))],
        };
        let mut quals = KeyColumnQuals::new();
        quals.insert("author".to_string(), QualValue::String("bob".to_string()));
        assert!(row.matches(&quals));
        quals.insert("id".to_string(), QualValue::Int(2));
        assert!(!row.matches(&quals));
    }
}
