/// Configuration is read from a TOML file, by default at `<config dir>/pulse/config.toml`.
/// There are only a few keys; `data_dir` is the one that matters, pointing at the directory
/// that holds the dataset CSVs. Unknown keys are warned about rather than rejected, so a
/// config file can be shared with tooling that carries extra keys.
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read configuration file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("Failed to decode configuration file {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("Missing key {key} in configuration file {path}")]
    MissingKey { key: String, path: PathBuf },
    #[error("Invalid value for key {key} in configuration file {path}: {message}")]
    InvalidValue { key: String, path: PathBuf, message: String },
}

const KNOWN_KEYS: [&str; 3] = ["data_dir", "overview_show_limit", "histogram_bin_width"];

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory containing the dataset CSV files.
    pub data_dir: PathBuf,
    /// How many upcoming/recent shows the overview page lists per side.
    pub overview_show_limit: usize,
    /// Bin width for the track popularity histogram.
    pub histogram_bin_width: i64,
}

impl Config {
    pub fn parse(config_path_override: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match config_path_override {
            Some(p) => p.to_path_buf(),
            None => default_config_path(),
        };
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: path.clone(),
            source: e,
        })?;
        let value: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::Decode {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let table = value.as_table().ok_or_else(|| ConfigError::Decode {
            path: path.clone(),
            message: "top level must be a table".to_string(),
        })?;

        for key in table.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                warn!("unknown key {} in configuration file {}", key, path.display());
            }
        }

        let data_dir = match table.get("data_dir") {
            Some(toml::Value::String(s)) => PathBuf::from(shellexpand::tilde(s).to_string()),
            Some(_) => {
                return Err(ConfigError::InvalidValue {
                    key: "data_dir".to_string(),
                    path,
                    message: "expected a string path".to_string(),
                })
            }
            None => {
                return Err(ConfigError::MissingKey {
                    key: "data_dir".to_string(),
                    path,
                })
            }
        };

        let overview_show_limit = match table.get("overview_show_limit") {
            Some(toml::Value::Integer(n)) if *n >= 1 => *n as usize,
            Some(_) => {
                return Err(ConfigError::InvalidValue {
                    key: "overview_show_limit".to_string(),
                    path,
                    message: "expected a positive integer".to_string(),
                })
            }
            None => 5,
        };

        let histogram_bin_width = match table.get("histogram_bin_width") {
            Some(toml::Value::Integer(n)) if *n >= 1 => *n,
            Some(_) => {
                return Err(ConfigError::InvalidValue {
                    key: "histogram_bin_width".to_string(),
                    path,
                    message: "expected a positive integer".to_string(),
                })
            }
            None => 10,
        };

        Ok(Config {
            data_dir,
            overview_show_limit,
            histogram_bin_width,
        })
    }
}

fn default_config_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("pulse").join("config.toml"),
        None => PathBuf::from("~/.config/pulse/config.toml"),
    }
}
