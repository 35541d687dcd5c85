use crate::error::{Error, Result};
use crate::plugin::table::ColumnType;
use std::collections::HashMap;

/// Value of an `=` qual supplied by the host
#[derive(Debug, Clone, PartialEq)]
pub enum QualValue {
    Int(i64),
    String(String),
    Bool(bool),
}

/// Equality quals keyed by column name
pub type KeyColumnQuals = HashMap<String, QualValue>;

impl QualValue {
    /// Parses a raw qual value according to the declared column type.
    pub fn parse(column: &str, column_type: ColumnType, raw: &str) -> Result<Self> {
        match column_type {
            ColumnType::Int => raw.trim().parse::<i64>().map(QualValue::Int).map_err(|_| {
                Error::UnsupportedQuery(format!(
                    "Column '{column}' expects an integer, got '{raw}'"
                ))
            }),
            ColumnType::Bool => match raw.trim() {
                "true" => Ok(QualValue::Bool(true)),
                "false" => Ok(QualValue::Bool(false)),
                _ => Err(Error::UnsupportedQuery(format!(
                    "Column '{column}' expects true or false, got '{raw}'"
                ))),
            },
            ColumnType::String => Ok(QualValue::String(raw.to_string())),
            ColumnType::Timestamp | ColumnType::Json => Err(Error::UnsupportedQuery(format!(
                "Column '{column}' of type {column_type} does not support '=' qualifiers"
            ))),
        }
    }

    pub fn string_value(&self) -> Option<&str> {
        match self {
            QualValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn int64_value(&self) -> Option<i64> {
        match self {
            QualValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn bool_value(&self) -> Option<bool> {
        match self {
            QualValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}
