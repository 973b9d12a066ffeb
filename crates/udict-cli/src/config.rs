use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_DICTIONARY_NAME: &str = "dict-weekday";
pub const DEFAULT_DB_PATH: &str =
    "~/Library/Application Support/Google/JapaneseInput/user_dictionary.db";
pub const DEFAULT_POS: u64 = 1;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config requires at least one day entry")]
    NoDays,

    #[error("config requires at least one format")]
    NoFormats,

    #[error("cannot determine the home directory to expand '~'")]
    NoHomeDir,

    #[error("day offset {offset_days} is outside the supported calendar range")]
    OffsetOutOfRange { offset_days: i64 },
}

/// A dictionary key and which day, relative to today, it stands for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayConfig {
    pub key: String,
    pub offset_days: i64,
}

/// Tool configuration, read from a JSON file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_dictionary_name")]
    pub dictionary_name: String,
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    #[serde(default = "default_pos")]
    pub pos: u64,
    #[serde(default)]
    pub days: Vec<DayConfig>,
    #[serde(default)]
    pub formats: Vec<String>,
}

fn default_dictionary_name() -> String {
    DEFAULT_DICTIONARY_NAME.into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from(DEFAULT_DB_PATH)
}

fn default_pos() -> u64 {
    DEFAULT_POS
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate. `~` in `db_path` is expanded.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let mut config: Config = serde_json::from_str(text)?;
        if config.days.is_empty() {
            return Err(ConfigError::NoDays);
        }
        if config.formats.is_empty() {
            return Err(ConfigError::NoFormats);
        }
        config.db_path = expand_tilde(&config.db_path)?;
        Ok(config)
    }
}

/// Replace a leading `~` with the user's home directory. Other paths are
/// returned unchanged.
pub fn expand_tilde(path: &Path) -> Result<PathBuf, ConfigError> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
            Ok(home.join(rest))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}
