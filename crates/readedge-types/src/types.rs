use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of one "analyze article" call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleAnalysis {
    pub title: String,
    pub segments: Vec<ArticleSegment>,
}

/// One paragraph-level block of the article, paired with its translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSegment {
    pub id: String,
    pub original_text: String,
    pub translated_text: String,
    pub vocabulary: Vec<VocabItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabItem {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    pub definition: String,
    pub importance: Importance,
}

/// Coarse relevance tag chosen by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::High => "high",
            Importance::Medium => "medium",
            Importance::Low => "low",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dictionary card produced by one word lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordDetail {
    pub word: String,
    pub phonetic: String,
    pub definition: String,
    pub part_of_speech: String,
    pub example_sentence: String,
    pub usage_tips: String,
}

/// Persisted word book entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedWord {
    #[serde(flatten)]
    pub detail: WordDetail,
    /// Unix timestamp in milliseconds
    pub added_at: i64,
}

impl SavedWord {
    pub fn new(detail: WordDetail, added_at: i64) -> Self {
        Self { detail, added_at }
    }

    pub fn word(&self) -> &str {
        &self.detail.word
    }
}

/// Screen currently shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Input,
    Analyzing,
    Reading,
    WordBook,
    /// Never entered: failures fold back into `Input` with a message
    Error,
}

impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewState::Input => "INPUT",
            ViewState::Analyzing => "ANALYZING",
            ViewState::Reading => "READING",
            ViewState::WordBook => "WORDBOOK",
            ViewState::Error => "ERROR",
        };
        f.write_str(name)
    }
}
