use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, env_parse, env_string};

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

pub(crate) fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GeminiConfig {
    /// Never written back to disk
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            api_url: default_api_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl GeminiConfig {
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(key) = env_string("GEMINI_API_KEY").or_else(|| env_string("API_KEY")) {
            self.api_key = key;
        }
        if let Some(model) = env_string("READEDGE_MODEL") {
            self.model = model;
        }
        if let Some(url) = env_string("READEDGE_API_URL") {
            self.api_url = url;
        }
        if let Some(timeout) = env_parse("READEDGE_TIMEOUT_SECONDS")? {
            self.timeout_seconds = timeout;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
