/// How the article text was provided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Text,
    Link,
    File,
}

/// User actions parsed from the terminal
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Append a line to the pasted article text
    AppendText(String),
    /// Replace the article text with the built-in sample
    LoadSample,
    /// Switch input mode to link and remember the url
    Link(String),
    /// Load a .txt/.md file into the article text
    File(String),
    /// Clear the pending article text
    Clear,
    Submit,
    OpenWordBook,
    Back,
    /// Select the n-th selectable token of a segment (both 1-based)
    SelectToken { segment: usize, token: usize },
    /// Select the n-th vocabulary item of a segment (both 1-based)
    SelectVocab { segment: usize, item: usize },
    /// Open the n-th word book entry (1-based)
    OpenSaved(usize),
    ToggleSave,
    Remove(String),
    CloseCard,
    PlaySegment(usize),
    SayWord,
    StopSpeech,
    Help,
    Quit,
}
