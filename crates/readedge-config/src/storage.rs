use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::env_string;

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one file per storage key
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    pub fn apply_env(&mut self) {
        if let Some(dir) = env_string("READEDGE_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
    }
}
