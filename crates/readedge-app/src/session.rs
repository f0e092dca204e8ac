use readedge_core::input::ArticleInput;
use readedge_core::view::ViewController;
use readedge_types::SavedWord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackTarget {
    /// Zero-based segment index
    Segment(usize),
    Word,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playback {
    pub target: PlaybackTarget,
    pub token: u64,
}

/// Everything the screens show, owned by the event loop
#[derive(Debug, Default)]
pub struct Session {
    pub view: ViewController,
    pub input: ArticleInput,
    /// Word book snapshot taken when the book screen opens or changes
    pub saved_words: Vec<SavedWord>,
    pub playing: Option<Playback>,
    /// One-shot message shown under the next screen
    pub notice: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn is_playing(&self, target: PlaybackTarget) -> bool {
        self.playing.is_some_and(|p| p.target == target)
    }
}
