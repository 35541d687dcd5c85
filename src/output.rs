use crate::error::Result;
use crate::plugin::row::Row;
use crate::plugin::table::Table;
use std::io::{self, Write};

/// Writes a line to stdout and, when given, to `copy` as well.
///
/// A failing stdout is logged, not returned; the copy must succeed.
pub fn println(message: &str, copy: &mut Option<&mut dyn Write>) -> io::Result<()> {
    if let Err(e) = writeln!(io::stdout(), "{message}") {
        tracing::error!(error = %e, "failed to write to stdout");
    }

    if let Some(w) = copy {
        writeln!(w, "{message}")?;
    }

    Ok(())
}

/// One `name<TAB>description` line per registered table.
pub fn print_tables(tables: &[Table], copy: &mut Option<&mut dyn Write>) -> io::Result<()> {
    for table in tables {
        println(&format!("{}\t{}", table.name, table.description), copy)?;
    }
    Ok(())
}

/// One `name<TAB>TYPE<TAB>description` line per column, in declaration order.
pub fn print_columns(table: &Table, copy: &mut Option<&mut dyn Write>) -> io::Result<()> {
    for column in &table.columns {
        println(
            &format!(
                "{}\t{}\t{}",
                column.name, column.column_type, column.description
            ),
            copy,
        )?;
    }
    Ok(())
}

/// Each row as a single-line JSON object.
pub fn print_rows(rows: &[Row], copy: &mut Option<&mut dyn Write>) -> Result<()> {
    for row in rows {
        println(&serde_json::to_string(row)?, copy)?;
    }
    Ok(())
}
