mod session_flow_tests;

use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use readedge_ai::StudyAssistant;
use readedge_ai::mock::ScriptedBackend;
use readedge_config::Config;
use readedge_speech::Speaker;
use readedge_types::Command;
use readedge_wordbook::{MemoryStore, WordBook};
use tokio::time::timeout;

use crate::AppState;
use crate::events::{AppEvent, Flow, handle_events};
use crate::session::Session;

pub const CAT_ANALYSIS: &str = r#"{
    "title": "Cats",
    "segments": [{
        "id": "1",
        "originalText": "The cat sat.",
        "translatedText": "Le chat s'est assis.",
        "vocabulary": [{"word": "cat", "phonetic": "/kaet/", "definition": "a small feline", "importance": "high"}]
    }]
}"#;

pub const CAT_DETAIL: &str = r#"{
    "word": "cat",
    "phonetic": "/kaet/",
    "definition": "A small domesticated feline.",
    "partOfSpeech": "noun",
    "exampleSentence": "The cat sat.",
    "usageTips": "Countable noun."
}"#;

/// Drives the event handlers the way the event loop does, without a terminal
pub struct Harness {
    pub state: Arc<AppState>,
    pub session: Session,
    pub backend: Arc<ScriptedBackend>,
    pub store: Arc<MemoryStore>,
    pub events_tx: AsyncSender<AppEvent>,
    pub events_rx: AsyncReceiver<AppEvent>,
}

impl Harness {
    pub fn new(speaker: Option<Speaker>) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), speaker)
    }

    pub fn with_store(store: Arc<MemoryStore>, speaker: Option<Speaker>) -> Self {
        let mut config = Config::default();
        config.gemini.api_key = "test-key".to_string();

        let backend = Arc::new(ScriptedBackend::new());
        let assistant = StudyAssistant::new(backend.clone());
        let word_book = WordBook::new(store.clone());
        let (events_tx, events_rx) = kanal::unbounded_async();

        Self {
            state: Arc::new(AppState::new(config, assistant, word_book, speaker)),
            session: Session::new(),
            backend,
            store,
            events_tx,
            events_rx,
        }
    }

    pub async fn send(&mut self, event: AppEvent) -> Flow {
        handle_events(&self.state, &mut self.session, &self.events_tx, event)
            .await
            .expect("handler failed")
    }

    pub async fn command(&mut self, command: Command) -> Flow {
        self.send(AppEvent::Command(command)).await
    }

    /// Handle the next event a background task produced
    pub async fn pump(&mut self) {
        let event = timeout(Duration::from_secs(2), self.events_rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("channel closed");
        self.send(event).await;
    }

    /// Submit the cat article and land on the reading screen
    pub async fn read_cat_article(&mut self) {
        self.backend.push_text(CAT_ANALYSIS);
        self.command(Command::AppendText("The cat sat.".to_string()))
            .await;
        self.command(Command::Submit).await;
        self.pump().await;
    }
}
