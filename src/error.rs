use thiserror::Error;

/// Errors surfaced by table handlers and the query host.
#[derive(Error, Debug)]
pub enum Error {
    /// Base address or token missing after merging environment and connection config.
    #[error("{0}")]
    Config(String),

    /// The query cannot be served as written, e.g. an unfiltered issue listing
    /// against gitlab.com.
    #[error("{0}")]
    UnsupportedQuery(String),

    /// Non-success response from the GitLab API, body kept verbatim.
    #[error("GitLab API error: HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Column '{column}': {message}")]
    Transform { column: String, message: String },

    #[error("Unknown table: {0}")]
    UnknownTable(String),
}

impl Error {
    pub fn transform(column: &str, message: impl Into<String>) -> Self {
        Error::Transform {
            column: column.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
