//! Screen state machine for the reading session.
//!
//! Only the transitions in [`transition`] are legal; everything else is
//! rejected and leaves the controller untouched.

use readedge_types::{ArticleAnalysis, ViewState, WordDetail};

pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Failed to analyze the article. Please try again or check your API key.";
pub const INVALID_WORD_MESSAGE: &str = "Invalid word selection";
pub const LOOKUP_FAILED_MESSAGE: &str = "Failed to load word details.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    Submit,
    AnalysisSucceeded,
    AnalysisFailed,
    Back,
    OpenWordBook,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{event:?} is not allowed in {from}")]
pub struct TransitionError {
    pub from: ViewState,
    pub event: ViewEvent,
}

/// Transition table
pub fn transition(from: ViewState, event: ViewEvent) -> Option<ViewState> {
    use ViewEvent::*;
    use ViewState::*;

    match (from, event) {
        (Input, Submit) => Some(Analyzing),
        (Analyzing, AnalysisSucceeded) => Some(Reading),
        (Analyzing, AnalysisFailed) => Some(Input),
        (Reading, Back) => Some(Input),
        (Input, OpenWordBook) => Some(WordBook),
        (WordBook, Back) => Some(Input),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardStatus {
    Loading,
    Ready(WordDetail),
    Failed(String),
}

/// Dictionary card for one selected word
#[derive(Debug, Clone, PartialEq)]
pub struct WordCard {
    pub request_id: u64,
    /// Token as selected, punctuation included
    pub word: String,
    pub context: Option<String>,
    pub status: CardStatus,
    pub saved: bool,
}

impl WordCard {
    pub fn detail(&self) -> Option<&WordDetail> {
        match &self.status {
            CardStatus::Ready(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Handle for a lookup the caller has to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub request_id: u64,
    pub word: String,
    pub context: Option<String>,
}

#[derive(Debug, Default)]
pub struct ViewController {
    state: ViewState,
    analysis: Option<ArticleAnalysis>,
    error: Option<String>,
    card: Option<WordCard>,
    next_request_id: u64,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn analysis(&self) -> Option<&ArticleAnalysis> {
        self.analysis.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn card(&self) -> Option<&WordCard> {
        self.card.as_ref()
    }

    fn apply(&mut self, event: ViewEvent) -> Result<ViewState, TransitionError> {
        let next = transition(self.state, event).ok_or(TransitionError {
            from: self.state,
            event,
        })?;
        tracing::debug!("View transition {} --{:?}--> {}", self.state, event, next);
        self.state = next;
        Ok(next)
    }

    /// Input -> Analyzing; clears any previous error
    pub fn submit(&mut self) -> Result<(), TransitionError> {
        self.apply(ViewEvent::Submit)?;
        self.error = None;
        Ok(())
    }

    pub fn analysis_succeeded(&mut self, analysis: ArticleAnalysis) -> Result<(), TransitionError> {
        self.apply(ViewEvent::AnalysisSucceeded)?;
        self.analysis = Some(analysis);
        Ok(())
    }

    pub fn analysis_failed(&mut self, message: impl Into<String>) -> Result<(), TransitionError> {
        self.apply(ViewEvent::AnalysisFailed)?;
        let message = message.into();
        self.error = Some(if message.trim().is_empty() {
            ANALYSIS_FAILED_MESSAGE.to_string()
        } else {
            message
        });
        Ok(())
    }

    /// Reading/WordBook -> Input; discards the analysis and any open card
    pub fn back(&mut self) -> Result<(), TransitionError> {
        self.apply(ViewEvent::Back)?;
        self.analysis = None;
        self.error = None;
        self.card = None;
        Ok(())
    }

    pub fn open_word_book(&mut self) -> Result<(), TransitionError> {
        self.apply(ViewEvent::OpenWordBook)?;
        Ok(())
    }

    /// Open a word card, replacing any card already shown.
    ///
    /// Only valid while reading or browsing the word book.
    pub fn open_card(
        &mut self,
        word: impl Into<String>,
        context: Option<String>,
    ) -> Option<LookupTicket> {
        if !matches!(self.state, ViewState::Reading | ViewState::WordBook) {
            return None;
        }

        self.next_request_id += 1;
        let word = word.into();
        let ticket = LookupTicket {
            request_id: self.next_request_id,
            word: word.clone(),
            context: context.clone(),
        };

        self.card = Some(WordCard {
            request_id: ticket.request_id,
            word,
            context,
            status: CardStatus::Loading,
            saved: false,
        });

        Some(ticket)
    }

    /// Apply a lookup result. Returns false when the card it belongs to is
    /// no longer open.
    pub fn complete_lookup(&mut self, request_id: u64, status: CardStatus) -> bool {
        match self.card.as_mut() {
            Some(card) if card.request_id == request_id => {
                card.status = status;
                true
            }
            _ => {
                tracing::debug!("Dropping stale lookup result #{}", request_id);
                false
            }
        }
    }

    pub fn set_saved(&mut self, request_id: u64, saved: bool) -> bool {
        match self.card.as_mut() {
            Some(card) if card.request_id == request_id => {
                card.saved = saved;
                true
            }
            _ => false,
        }
    }

    pub fn close_card(&mut self) {
        self.card = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readedge_types::ArticleSegment;

    fn analysis() -> ArticleAnalysis {
        ArticleAnalysis {
            title: "Cats".to_string(),
            segments: vec![ArticleSegment {
                id: "1".to_string(),
                original_text: "The cat sat.".to_string(),
                translated_text: "猫坐着。".to_string(),
                vocabulary: vec![],
            }],
        }
    }

    fn detail(word: &str) -> WordDetail {
        WordDetail {
            word: word.to_string(),
            phonetic: String::new(),
            definition: String::new(),
            part_of_speech: String::new(),
            example_sentence: String::new(),
            usage_tips: String::new(),
        }
    }

    #[test]
    fn test_transition_table() {
        use ViewEvent::*;
        use ViewState::*;

        assert_eq!(transition(Input, Submit), Some(Analyzing));
        assert_eq!(transition(Analyzing, AnalysisSucceeded), Some(Reading));
        assert_eq!(transition(Analyzing, AnalysisFailed), Some(Input));
        assert_eq!(transition(Reading, Back), Some(Input));
        assert_eq!(transition(Input, OpenWordBook), Some(WordBook));
        assert_eq!(transition(WordBook, Back), Some(Input));

        assert_eq!(transition(Analyzing, Back), None);
        assert_eq!(transition(Analyzing, OpenWordBook), None);
        assert_eq!(transition(Reading, Submit), None);
        assert_eq!(transition(Input, Back), None);
    }

    #[test]
    fn test_error_state_never_reachable() {
        use ViewEvent::*;

        let states = [
            ViewState::Input,
            ViewState::Analyzing,
            ViewState::Reading,
            ViewState::WordBook,
            ViewState::Error,
        ];
        let events = [Submit, AnalysisSucceeded, AnalysisFailed, Back, OpenWordBook];

        for from in states {
            for event in events {
                assert_ne!(transition(from, event), Some(ViewState::Error));
            }
        }
    }

    #[test]
    fn test_success_path() {
        let mut view = ViewController::new();
        view.submit().unwrap();
        assert_eq!(view.state(), ViewState::Analyzing);

        view.analysis_succeeded(analysis()).unwrap();
        assert_eq!(view.state(), ViewState::Reading);
        assert_eq!(view.analysis().unwrap().segments.len(), 1);

        view.back().unwrap();
        assert_eq!(view.state(), ViewState::Input);
        assert!(view.analysis().is_none());
    }

    #[test]
    fn test_failure_returns_to_input_with_message() {
        let mut view = ViewController::new();
        view.submit().unwrap();
        view.analysis_failed(ANALYSIS_FAILED_MESSAGE).unwrap();

        assert_eq!(view.state(), ViewState::Input);
        assert_eq!(view.error(), Some(ANALYSIS_FAILED_MESSAGE));

        view.submit().unwrap();
        assert!(view.error().is_none());
    }

    #[test]
    fn test_failure_message_never_empty() {
        let mut view = ViewController::new();
        view.submit().unwrap();
        view.analysis_failed("").unwrap();
        assert!(!view.error().unwrap().is_empty());
    }

    #[test]
    fn test_illegal_transition_keeps_state() {
        let mut view = ViewController::new();
        view.submit().unwrap();

        let err = view.open_word_book().unwrap_err();
        assert_eq!(err.from, ViewState::Analyzing);
        assert_eq!(view.state(), ViewState::Analyzing);
    }

    #[test]
    fn test_card_only_in_reading_or_word_book() {
        let mut view = ViewController::new();
        assert!(view.open_card("cat", None).is_none());

        view.open_word_book().unwrap();
        assert!(view.open_card("cat", None).is_some());
    }

    #[test]
    fn test_stale_lookup_dropped() {
        let mut view = ViewController::new();
        view.submit().unwrap();
        view.analysis_succeeded(analysis()).unwrap();

        let first = view.open_card("cat", Some("The cat sat.".to_string())).unwrap();
        let second = view.open_card("sat.", Some("The cat sat.".to_string())).unwrap();
        assert_ne!(first.request_id, second.request_id);

        assert!(!view.complete_lookup(first.request_id, CardStatus::Ready(detail("cat"))));
        assert_eq!(view.card().unwrap().status, CardStatus::Loading);

        assert!(view.complete_lookup(second.request_id, CardStatus::Ready(detail("sat"))));
        assert_eq!(view.card().unwrap().detail().unwrap().word, "sat");
    }

    #[test]
    fn test_closed_card_ignores_completion() {
        let mut view = ViewController::new();
        view.open_word_book().unwrap();
        let ticket = view.open_card("cat", None).unwrap();
        view.close_card();

        assert!(!view.complete_lookup(
            ticket.request_id,
            CardStatus::Failed(LOOKUP_FAILED_MESSAGE.to_string())
        ));
        assert!(view.card().is_none());
    }

    #[test]
    fn test_back_clears_card() {
        let mut view = ViewController::new();
        view.open_word_book().unwrap();
        view.open_card("cat", None).unwrap();
        view.back().unwrap();
        assert!(view.card().is_none());
    }
}
