//! Host-facing contract: table descriptors, quals, row projection and
//! query dispatch.

pub mod quals;
pub mod query;
pub mod row;
pub mod table;

use crate::error::{Error, Result};
use crate::tables::{issue::table_issue, project::table_project};
use table::Table;

/// Registered tables
#[derive(Debug, Clone)]
pub struct Plugin {
    pub tables: Vec<Table>,
}

impl Plugin {
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }
}

pub fn plugin() -> Plugin {
    Plugin {
        tables: vec![table_project(), table_issue()],
    }
}
