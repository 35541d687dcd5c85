/// Enum representing CLI commands
#[derive(Debug, PartialEq)]
pub enum Command {
    Tables,
    Describe {
        table: String,
    },
    Query {
        table: String,
        quals: Vec<(String, String)>,
    },
    Help,
    Unknown(String),
}

pub const USAGE: &str = "Usage:
  gitlab-tables tables
  gitlab-tables describe <table>
  gitlab-tables query <table> [<column>=<value> ...]";

/// Parse command line arguments and return a Command
///
/// # Arguments
/// * `args` - Command line arguments (including program name)
///
/// # Returns
/// * `Command` - The parsed command
pub fn parse_args(args: &[String]) -> Command {
    match args.len() {
        0 | 1 => Command::Help,
        2 => match args[1].as_str() {
            "tables" => Command::Tables,
            "help" | "--help" | "-h" => Command::Help,
            "describe" | "query" => Command::Unknown(format!(
                "Missing table argument. Usage: gitlab-tables {} <table>",
                args[1]
            )),
            cmd => Command::Unknown(cmd.to_string()),
        },
        _ => match args[1].as_str() {
            "describe" if args.len() == 3 => Command::Describe {
                table: args[2].clone(),
            },
            "query" => match parse_quals(&args[3..]) {
                Ok(quals) => Command::Query {
                    table: args[2].clone(),
                    quals,
                },
                Err(message) => Command::Unknown(message),
            },
            cmd => Command::Unknown(cmd.to_string()),
        },
    }
}

/// Splits `column=value` arguments. The value may itself contain `=`.
fn parse_quals(args: &[String]) -> Result<Vec<(String, String)>, String> {
    args.iter()
        .map(|arg| match arg.split_once('=') {
            Some((column, value)) if !column.is_empty() => {
                Ok((column.to_string(), value.to_string()))
            }
            _ => Err(format!(
                "Invalid qualifier '{arg}'. Please use <column>=<value>."
            )),
        })
        .collect()
}
