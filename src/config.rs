use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Connection configuration keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    BaseUrl,
    Token,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::BaseUrl => "base_url",
            ConfigKey::Token => "token",
        }
    }

    /// Environment variable supplying the default for this key
    pub fn env_var(&self) -> &'static str {
        match self {
            ConfigKey::BaseUrl => "GITLAB_ADDR",
            ConfigKey::Token => "GITLAB_TOKEN",
        }
    }

    /// Get all config keys
    pub fn all() -> &'static [ConfigKey] {
        &[ConfigKey::BaseUrl, ConfigKey::Token]
    }
}

/// Filename for the connection configuration within the config directory.
pub const CONNECTION_CONFIG_FILENAME: &str = "connection.json";
/// Directory name for connection configuration, relative to the working directory.
pub const CONNECTION_CONFIG_DIR: &str = ".gitlab-tables";

/// API root of the hosted multi-tenant GitLab deployment.
pub const GITLAB_CLOUD_API_URL: &str = "https://gitlab.com/api/v4";

const MISSING_BASE_URL: &str =
    "GitLab Base Address must be set either in GITLAB_ADDR env var or in connection config file";
const MISSING_TOKEN: &str = "GitLab Private/Personal Access Token must be set either in GITLAB_TOKEN env var or in connection config file";

/// Parses a JSON connection config into a map of configuration values.
///
/// - Returns an empty map if `content` is empty or whitespace only.
/// - Keys set to `null` are treated as absent.
/// - Returns an `Err` if the content is not a JSON object, or if a known key
///   holds anything other than a string.
pub fn parse_config(content: &[u8]) -> Result<HashMap<ConfigKey, Value>> {
    if content.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(HashMap::new());
    }

    let value: Value = serde_json::from_slice(content)?;

    let mut config_map = HashMap::new();

    if let Value::Object(map) = &value {
        for key in ConfigKey::all() {
            match map.get(key.as_str()) {
                None | Some(Value::Null) => {}
                Some(val @ Value::String(_)) => {
                    config_map.insert(*key, val.clone());
                }
                Some(_) => {
                    return Err(Error::Config(format!(
                        "Connection config value for '{}' must be a string",
                        key.as_str()
                    )));
                }
            }
        }
        return Ok(config_map);
    }

    Err(Error::Config(
        "Connection config must be a JSON object".to_string(),
    ))
}

/// Reads `<dir>/connection.json`. A missing file yields an empty config.
pub fn load_connection_config(dir: &Path) -> Result<HashMap<ConfigKey, Value>> {
    let path = dir.join(CONNECTION_CONFIG_FILENAME);
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = std::fs::read(&path)?;
    parse_config(&content)
}

/// Collects the configuration values present in the environment.
pub fn config_from_env<F>(lookup: F) -> HashMap<ConfigKey, Value>
where
    F: Fn(&str) -> Option<String>,
{
    ConfigKey::all()
        .iter()
        .filter_map(|key| lookup(key.env_var()).map(|v| (*key, Value::String(v))))
        .collect()
}

/// Merges `updates` into `base_config` and returns a new configuration map.
///
/// If a key exists in both, the value from `updates` wins.
pub fn update_config(
    base_config: &HashMap<ConfigKey, Value>,
    updates: &HashMap<ConfigKey, Value>,
) -> HashMap<ConfigKey, Value> {
    let mut new_config = base_config.clone();
    for (key, value) in updates {
        new_config.insert(*key, value.clone());
    }
    new_config
}

/// Resolved connection settings, built once and shared by every handler.
#[derive(Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub token: String,
}

impl Settings {
    /// Resolves settings from environment defaults overridden by connection config.
    ///
    /// No network call is made here.
    pub fn resolve(
        env: &HashMap<ConfigKey, Value>,
        connection: &HashMap<ConfigKey, Value>,
    ) -> Result<Self> {
        let merged = update_config(env, connection);
        let get = |key: ConfigKey| {
            merged
                .get(&key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_string()
        };

        let base_url = get(ConfigKey::BaseUrl);
        if base_url.is_empty() {
            return Err(Error::Config(MISSING_BASE_URL.to_string()));
        }
        let token = get(ConfigKey::Token);
        if token.is_empty() {
            return Err(Error::Config(MISSING_TOKEN.to_string()));
        }

        Ok(Settings {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// True when the resolved address is gitlab.com, where unfiltered
    /// instance-wide listings are rejected upstream.
    pub fn is_gitlab_cloud(&self) -> bool {
        self.base_url == GITLAB_CLOUD_API_URL
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}
