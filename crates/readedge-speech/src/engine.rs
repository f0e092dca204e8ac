use std::process::Stdio;

use async_trait::async_trait;
use readedge_config::speech::SpeechConfig;
use tokio::process::Command;

use crate::SpeechError;

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub locale: String,
    /// 1.0 is the engine's normal speed
    pub rate: f32,
}

/// Text-to-speech capability
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Speak until playback ends. Dropping the future must stop playback.
    async fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError>;
}

/// Runs an espeak-compatible program, one child process per utterance
pub struct CommandEngine {
    program: String,
    base_wpm: u32,
}

impl CommandEngine {
    pub fn new(program: impl Into<String>, base_wpm: u32) -> Self {
        Self {
            program: program.into(),
            base_wpm,
        }
    }

    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(config.command.clone(), config.base_wpm)
    }

    pub fn args(&self, utterance: &Utterance) -> Vec<String> {
        let wpm = (self.base_wpm as f32 * utterance.rate).round().max(1.0) as u32;
        vec![
            "-v".to_string(),
            utterance.locale.to_ascii_lowercase(),
            "-s".to_string(),
            wpm.to_string(),
            "--".to_string(),
            utterance.text.clone(),
        ]
    }
}

#[async_trait]
impl SpeechEngine for CommandEngine {
    async fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
        let mut child = Command::new(&self.program)
            .args(self.args(utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SpeechError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let status = child
            .wait()
            .await
            .map_err(|e| SpeechError::Engine(e.to_string()))?;

        if status.success() {
            Ok(())
        } else {
            Err(SpeechError::Exit(status))
        }
    }
}
