use serde::{Deserialize, Serialize};

use crate::{ConfigError, env_parse, env_string};

fn default_enabled() -> bool {
    true
}

fn default_command() -> String {
    "espeak-ng".to_string()
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_segment_rate() -> f32 {
    0.9
}

fn default_word_rate() -> f32 {
    1.0
}

fn default_base_wpm() -> u32 {
    175
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SpeechConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// External text-to-speech program
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Slightly slower for study
    #[serde(default = "default_segment_rate")]
    pub segment_rate: f32,
    #[serde(default = "default_word_rate")]
    pub word_rate: f32,
    /// Engine words-per-minute at rate 1.0
    #[serde(default = "default_base_wpm")]
    pub base_wpm: u32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            command: default_command(),
            locale: default_locale(),
            segment_rate: default_segment_rate(),
            word_rate: default_word_rate(),
            base_wpm: default_base_wpm(),
        }
    }
}

impl SpeechConfig {
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(command) = env_string("READEDGE_SPEECH_COMMAND") {
            self.command = command;
        }
        if let Some(locale) = env_string("READEDGE_SPEECH_LOCALE") {
            self.locale = locale;
        }
        if let Some(rate) = env_parse("READEDGE_SPEECH_RATE")? {
            self.segment_rate = rate;
        }
        Ok(())
    }
}
