use crate::config::Settings;
use crate::error::{Error, Result};
use crate::plugin::quals::KeyColumnQuals;
use crate::plugin::row::{Row, project_row};
use crate::plugin::table::{ColumnType, Table};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Per-call state handed to every hydrate function.
#[derive(Debug, Clone)]
pub struct QueryData {
    pub settings: Arc<Settings>,
    pub quals: KeyColumnQuals,
}

impl QueryData {
    pub fn new(settings: Arc<Settings>, quals: KeyColumnQuals) -> Self {
        QueryData { settings, quals }
    }
}

/// Receiver for raw items produced by list and get handlers
pub trait RowSink {
    fn stream_list_item(&mut self, item: Value) -> Result<()>;
}

impl RowSink for Vec<Value> {
    fn stream_list_item(&mut self, item: Value) -> Result<()> {
        self.push(item);
        Ok(())
    }
}

/// Projects raw items through the table's columns and forwards matching rows.
struct Projector<'q, F> {
    table: &'q Table,
    quals: &'q KeyColumnQuals,
    emit: F,
}

impl<F> RowSink for Projector<'_, F>
where
    F: FnMut(Row) -> Result<()> + Send,
{
    fn stream_list_item(&mut self, item: Value) -> Result<()> {
        let row = project_row(self.table, &item, self.quals)?;
        // Quals without upstream support are enforced here.
        if row.matches(self.quals) {
            (self.emit)(row)?;
        }
        Ok(())
    }
}

/// Rejects quals on unknown columns or on columns that cannot be compared.
pub fn validate_quals(table: &Table, quals: &KeyColumnQuals) -> Result<()> {
    for name in quals.keys() {
        let column = table.column(name).ok_or_else(|| {
            Error::UnsupportedQuery(format!(
                "Table '{}' has no column named '{name}'",
                table.name
            ))
        })?;
        if matches!(column.column_type, ColumnType::Timestamp | ColumnType::Json) {
            return Err(Error::UnsupportedQuery(format!(
                "Column '{name}' of type {} does not support '=' qualifiers",
                column.column_type
            )));
        }
    }
    Ok(())
}

/// Quals the list hydrate may push upstream: those on `optional_key_columns`.
pub fn list_quals(table: &Table, quals: &KeyColumnQuals) -> KeyColumnQuals {
    quals
        .iter()
        .filter(|(name, _)| table.list.optional_key_columns.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Runs a query against `table`, emitting each projected row as it arrives.
///
/// The get hydrate is used when every get key column carries a qual;
/// otherwise the list hydrate streams all pages. Every qual in `d` is
/// enforced on the projected rows either way.
pub async fn execute<F>(table: &Table, d: &QueryData, emit: F) -> Result<()>
where
    F: FnMut(Row) -> Result<()> + Send,
{
    validate_quals(table, &d.quals)?;

    let mut projector = Projector {
        table,
        quals: &d.quals,
        emit,
    };

    match &table.get {
        Some(get) if get.key_columns.iter().all(|k| d.quals.contains_key(*k)) => {
            debug!(table = table.name, "using get hydrate");
            let item = (get.hydrate)(d).await?;
            projector.stream_list_item(item)
        }
        _ => {
            let pushdown = QueryData::new(d.settings.clone(), list_quals(table, &d.quals));
            debug!(
                table = table.name,
                pushdown = pushdown.quals.len(),
                "using list hydrate"
            );
            (table.list.hydrate)(&pushdown, &mut projector).await
        }
    }
}
