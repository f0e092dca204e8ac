use std::sync::Arc;

use readedge_ai::StudyAssistant;
use readedge_config::Config;
use readedge_speech::Speaker;
use readedge_wordbook::WordBook;
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub assistant: StudyAssistant,
    pub word_book: Arc<WordBook>,
    /// `None` when speech is disabled
    pub speaker: Option<Arc<Speaker>>,
}

impl AppState {
    pub fn new(
        config: Config,
        assistant: StudyAssistant,
        word_book: WordBook,
        speaker: Option<Speaker>,
    ) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            assistant,
            word_book: Arc::new(word_book),
            speaker: speaker.map(Arc::new),
        }
    }
}
