//! Configuration loaded from the process environment.
//!
//! Values come from `APP_*` environment variables, optionally backed by a
//! dotenv-format file (`properties.env` by default). Variables already set
//! in the process environment take precedence over the file.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `APP_DB_USERNAME` | required |
//! | `APP_DB_PASSWORD` | required |
//! | `APP_DB_NAME` | required |
//! | `APP_DB_HOST` | `localhost` |
//! | `APP_DB_PORT` | `5432` |
//! | `APP_DB_MAX_CONNECTIONS` | `5` |
//! | `APP_BIND` | `0.0.0.0:8010` |
//! | `APP_SUMMARY_MODE` | `lenient` |

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Env file read when `--env-file` is not given and the file exists.
pub const DEFAULT_ENV_FILE: &str = "properties.env";

#[derive(Debug, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub user: String,
    pub password: String,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub summary_mode: SummaryMode,
}

/// How `GET /articles/{tag}/{date}` treats a failed summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryMode {
    /// Log the failure and answer 200 with an empty summary.
    #[default]
    Lenient,
    /// Answer with the mapped error status.
    Strict,
}

impl FromStr for SummaryMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(SummaryMode::Lenient),
            "strict" => Ok(SummaryMode::Strict),
            other => bail!(
                "Unknown summary mode: '{}'. Must be lenient or strict.",
                other
            ),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}
fn default_port() -> u16 {
    5432
}
fn default_max_connections() -> u32 {
    5
}
fn default_bind() -> String {
    "0.0.0.0:8010".to_string()
}

impl Config {
    /// Build a config from a variable lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key).with_context(|| format!("{} must be set", key))
        };

        let port = match lookup("APP_DB_PORT") {
            Some(v) => v
                .parse::<u16>()
                .with_context(|| format!("APP_DB_PORT is not a valid port: '{}'", v))?,
            None => default_port(),
        };

        let max_connections = match lookup("APP_DB_MAX_CONNECTIONS") {
            Some(v) => v
                .parse::<u32>()
                .with_context(|| format!("APP_DB_MAX_CONNECTIONS is not a number: '{}'", v))?,
            None => default_max_connections(),
        };
        if max_connections == 0 {
            bail!("APP_DB_MAX_CONNECTIONS must be >= 1");
        }

        let summary_mode = match lookup("APP_SUMMARY_MODE") {
            Some(v) => v.parse()?,
            None => SummaryMode::default(),
        };

        let config = Config {
            db: DbConfig {
                user: required("APP_DB_USERNAME")?,
                password: required("APP_DB_PASSWORD")?,
                name: required("APP_DB_NAME")?,
                host: lookup("APP_DB_HOST").unwrap_or_else(default_host),
                port,
                max_connections,
            },
            server: ServerConfig {
                bind: lookup("APP_BIND").unwrap_or_else(default_bind),
                summary_mode,
            },
        };

        if config.db.name.trim().is_empty() {
            bail!("APP_DB_NAME must not be empty");
        }

        Ok(config)
    }
}

/// Read a dotenv-format file without touching the process environment.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let iter = dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to read env file: {}", path.display()))?;

    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) =
            item.with_context(|| format!("Failed to parse env file: {}", path.display()))?;
        vars.insert(key, value);
    }
    Ok(vars)
}

/// Load the configuration once at startup.
///
/// An explicit `env_file` must exist. Without one, [`DEFAULT_ENV_FILE`] is
/// read if present in the working directory.
pub fn load_config(env_file: Option<&Path>) -> Result<Config> {
    let file_vars = match env_file {
        Some(path) => read_env_file(path)?,
        None if Path::new(DEFAULT_ENV_FILE).is_file() => {
            read_env_file(Path::new(DEFAULT_ENV_FILE))?
        }
        None => HashMap::new(),
    };

    Config::from_lookup(|key| {
        std::env::var(key)
            .ok()
            .or_else(|| file_vars.get(key).cloned())
    })
}
