mod engine;
mod speaker;

pub use engine::{CommandEngine, SpeechEngine, Utterance};
pub use speaker::{SpeechEvent, Speaker};

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("Failed to start speech engine {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Speech engine exited with {0}")]
    Exit(std::process::ExitStatus),

    #[error("Speech engine error: {0}")]
    Engine(String),
}
