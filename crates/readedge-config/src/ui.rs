use serde::{Deserialize, Serialize};

fn default_preview_chars() -> usize {
    50
}

fn default_show_translation() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    /// Characters of a loaded file shown as preview
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
    #[serde(default = "default_show_translation")]
    pub show_translation: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            preview_chars: default_preview_chars(),
            show_translation: default_show_translation(),
        }
    }
}
