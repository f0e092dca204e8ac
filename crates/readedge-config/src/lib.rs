use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use self::gemini::GeminiConfig;
use self::speech::SpeechConfig;
use self::storage::StorageConfig;
use self::ui::UiConfig;

pub mod gemini;
pub mod speech;
pub mod storage;
pub mod ui;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("API key is missing: set GEMINI_API_KEY (or API_KEY)")]
    MissingApiKey,

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub storage: StorageConfig,
    pub speech: SpeechConfig,
    pub ui: UiConfig,
}

impl Config {
    /// Defaults overlaid with environment variables
    pub fn new() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load a JSON config file, then overlay environment variables.
    ///
    /// A missing file is not an error; the defaults are used instead.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Config::default()
        };

        config.apply_env()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.gemini.apply_env()?;
        self.storage.apply_env();
        self.speech.apply_env()?;
        Ok(())
    }

    /// Startup check: the backend cannot be reached without a credential
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gemini.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        for (key, rate) in [
            ("speech.segment_rate", self.speech.segment_rate),
            ("speech.word_rate", self.speech.word_rate),
        ] {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: rate.to_string(),
                });
            }
        }

        if self.gemini.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "gemini.timeout_seconds".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(())
    }
}

/// Non-empty env var, if set
pub(crate) fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match env_string(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value,
            }),
        None => Ok(None),
    }
}
