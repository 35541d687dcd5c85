use crate::error::Result;
use crate::plugin::query::{QueryData, RowSink};
use crate::plugin::row::Cell;
use futures::future::BoxFuture;
use serde_json::Value;
use std::fmt;

/// Column types a table may publish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    String,
    Bool,
    Timestamp,
    Json,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Int => "INT",
            ColumnType::String => "STRING",
            ColumnType::Bool => "BOOL",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Json => "JSON",
        };
        f.write_str(name)
    }
}

/// Maps an extracted field value to a cell. `Err` carries a message only;
/// the caller attaches the column name.
pub type TransformFn = fn(&Value) -> std::result::Result<Cell, String>;

/// Where a column's value comes from
#[derive(Clone, Copy)]
pub enum Transform {
    /// Dot-separated path into the raw API object, coerced to the column type.
    FromField(&'static str),
    /// Dot-separated path, then a custom transform.
    FromFieldWith(&'static str, TransformFn),
    /// Echo of the equality qual supplied for the named column.
    FromQual(&'static str),
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::FromField(path) => write!(f, "FromField({path})"),
            Transform::FromFieldWith(path, _) => write!(f, "FromFieldWith({path})"),
            Transform::FromQual(name) => write!(f, "FromQual({name})"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub description: &'static str,
    pub transform: Transform,
}

impl Column {
    /// Column bound to the API field of the same name.
    pub fn new(name: &'static str, column_type: ColumnType, description: &'static str) -> Self {
        Column {
            name,
            column_type,
            description,
            transform: Transform::FromField(name),
        }
    }

    pub fn from_field(mut self, path: &'static str) -> Self {
        self.transform = Transform::FromField(path);
        self
    }

    pub fn transform_with(mut self, path: &'static str, transform: TransformFn) -> Self {
        self.transform = Transform::FromFieldWith(path, transform);
        self
    }

    pub fn from_qual(mut self) -> Self {
        self.transform = Transform::FromQual(self.name);
        self
    }
}

/// Streams every matching raw item into the sink.
///
/// `QueryData::quals` holds only the quals named in `optional_key_columns`.
pub type ListHydrate =
    for<'a> fn(&'a QueryData, &'a mut (dyn RowSink + Send)) -> BoxFuture<'a, Result<()>>;

/// Fetches exactly one raw item by its key columns.
pub type GetHydrate = for<'a> fn(&'a QueryData) -> BoxFuture<'a, Result<Value>>;

#[derive(Clone)]
pub struct ListConfig {
    pub hydrate: ListHydrate,
    /// Columns whose `=` quals are handed to the list hydrate for pushdown.
    pub optional_key_columns: Vec<&'static str>,
}

#[derive(Clone)]
pub struct GetConfig {
    pub hydrate: GetHydrate,
    /// Every one of these must carry an `=` qual for the get path to run.
    pub key_columns: Vec<&'static str>,
}

#[derive(Clone)]
pub struct Table {
    pub name: &'static str,
    pub description: &'static str,
    pub list: ListConfig,
    pub get: Option<GetConfig>,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("columns", &self.columns.len())
            .field("get", &self.get.is_some())
            .finish()
    }
}
