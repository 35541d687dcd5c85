use crate::cli;
use crate::config;
use crate::error::Error;
use crate::output;
use crate::plugin::{self, quals::KeyColumnQuals, quals::QualValue, query, table::Table};
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Entry point shared by the binary and the acceptance tests.
///
/// `env` supplies environment variables, `connection_dir` overrides the
/// directory holding `connection.json`, and every line written to stdout is
/// also written to `stdout_additional` when given.
pub async fn run<E>(
    args: Vec<String>,
    env: E,
    connection_dir: Option<&Path>,
    mut stdout_additional: Option<&mut dyn std::io::Write>,
) -> anyhow::Result<()>
where
    E: Fn(&str) -> Option<String>,
{
    let plugin = plugin::plugin();

    match cli::parser::parse_args(&args) {
        cli::parser::Command::Tables => {
            output::print_tables(&plugin.tables, &mut stdout_additional)?;
        }
        cli::parser::Command::Describe { table } => {
            let table = plugin.table(&table)?;
            output::print_columns(table, &mut stdout_additional)?;
        }
        cli::parser::Command::Query { table, quals } => {
            let table = plugin.table(&table)?;
            let quals = parse_quals(table, &quals)?;

            let dir = connection_dir
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(config::CONNECTION_CONFIG_DIR));
            let connection = config::load_connection_config(&dir)
                .with_context(|| format!("Failed to load connection config from {}", dir.display()))?;
            let settings = config::Settings::resolve(&config::config_from_env(&env), &connection)?;
            debug!(?settings, "resolved connection");

            let d = query::QueryData::new(Arc::new(settings), quals);
            let mut rows = Vec::new();
            let result = query::execute(table, &d, |row| {
                rows.push(row);
                Ok(())
            })
            .await;

            // Rows gathered before a failure are still printed.
            output::print_rows(&rows, &mut stdout_additional)?;
            result?;
        }
        cli::parser::Command::Help => {
            output::println(cli::parser::USAGE, &mut stdout_additional)?;
        }
        cli::parser::Command::Unknown(message) => {
            return Err(anyhow::anyhow!("{message}\n{}", cli::parser::USAGE));
        }
    }
    Ok(())
}

fn parse_quals(table: &Table, raw: &[(String, String)]) -> Result<KeyColumnQuals, Error> {
    raw.iter()
        .map(|(name, value)| -> Result<(String, QualValue), Error> {
            let column = table.column(name).ok_or_else(|| {
                Error::UnsupportedQuery(format!(
                    "Table '{}' has no column named '{name}'",
                    table.name
                ))
            })?;
            Ok((name.clone(), QualValue::parse(name, column.column_type, value)?))
        })
        .collect()
}
