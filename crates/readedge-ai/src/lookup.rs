use readedge_core::text::clean_word;
use readedge_types::WordDetail;

use crate::schema::{self, DecodeError};
use crate::{BackendError, GenerateRequest, GenerativeBackend};

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// Selection has no letters, hyphens or apostrophes; nothing was sent
    #[error("Invalid word selection: {0:?}")]
    InvalidWord(String),

    #[error("Word lookup failed: {0}")]
    Backend(#[from] BackendError),

    #[error("Empty response for word lookup")]
    EmptyResponse,

    #[error("Word lookup response is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("Word lookup response violates schema at {path}: {message}")]
    SchemaViolation { path: String, message: String },
}

impl From<DecodeError> for LookupError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::MalformedJson(e) => LookupError::MalformedJson(e),
            DecodeError::SchemaViolation { path, message } => {
                LookupError::SchemaViolation { path, message }
            }
        }
    }
}

pub fn build_prompt(word: &str, context_sentence: Option<&str>) -> String {
    let context = context_sentence
        .map(|sentence| format!("Context sentence where it appears: \"{sentence}\"\n"))
        .unwrap_or_default();

    format!(
        "Analyze the English word: \"{word}\".
{context}
Provide:
1. Phonetic symbol (IPA).
2. Chinese definition (relevant to the context if provided).
3. Part of speech.
4. An English example sentence (different from the context).
5. A brief usage tip or recommended collocation (in Chinese).
"
    )
}

/// Validate the selection and build the request, or fail without a call
pub fn build_request(
    word: &str,
    context_sentence: Option<&str>,
) -> Result<GenerateRequest, LookupError> {
    let cleaned = clean_word(word);
    if cleaned.is_empty() {
        return Err(LookupError::InvalidWord(word.to_string()));
    }

    Ok(GenerateRequest {
        prompt: build_prompt(&cleaned, context_sentence),
        system_instruction: None,
        response_schema: schema::word_detail_schema(),
    })
}

/// Fetch a fresh dictionary card. Every call hits the backend.
pub async fn lookup(
    backend: &dyn GenerativeBackend,
    word: &str,
    context_sentence: Option<&str>,
) -> Result<WordDetail, LookupError> {
    let request = build_request(word, context_sentence)?;
    tracing::debug!("Looking up {:?} (context: {})", word, context_sentence.is_some());

    let text = backend
        .generate(&request)
        .await
        .inspect_err(|e| tracing::error!("Word lookup failed: {}", e))?
        .filter(|text| !text.trim().is_empty())
        .ok_or(LookupError::EmptyResponse)?;

    let detail = schema::decode(&text, &request.response_schema)
        .inspect_err(|e| tracing::error!("Word lookup response rejected: {}", e))?;

    Ok(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ScriptedBackend;

    const CAT_DETAIL: &str = r#"{"word":"cat","phonetic":"kæt","definition":"猫","partOfSpeech":"noun","exampleSentence":"The cat chased a mouse.","usageTips":"常用: a stray cat"}"#;

    #[tokio::test]
    async fn test_punctuation_is_invalid_without_request() {
        let backend = ScriptedBackend::new();
        let result = lookup(&backend, ".", Some("The cat sat.")).await;
        assert!(matches!(result, Err(LookupError::InvalidWord(w)) if w == "."));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_number_is_invalid() {
        let backend = ScriptedBackend::new();
        let result = lookup(&backend, "1999,", None).await;
        assert!(matches!(result, Err(LookupError::InvalidWord(_))));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_cleaned_word_and_context_sent() {
        let backend = ScriptedBackend::new();
        backend.push_text(CAT_DETAIL);

        let detail = lookup(&backend, "\"cat,", Some("The cat sat.")).await.unwrap();
        assert_eq!(detail.part_of_speech, "noun");

        let requests = backend.requests();
        assert!(requests[0].prompt.contains("\"cat\""));
        assert!(requests[0].prompt.contains("The cat sat."));
        assert!(requests[0].system_instruction.is_none());
    }

    #[tokio::test]
    async fn test_no_context_line_without_context() {
        let prompt = build_prompt("cat", None);
        assert!(!prompt.contains("Context sentence"));
    }

    #[tokio::test]
    async fn test_repeated_lookups_are_not_cached() {
        let backend = ScriptedBackend::new();
        backend.push_text(CAT_DETAIL);
        backend.push_text(CAT_DETAIL);

        lookup(&backend, "cat", None).await.unwrap();
        lookup(&backend, "cat", None).await.unwrap();
        assert_eq!(backend.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let backend = ScriptedBackend::new();
        backend.push_text("{\"word\": ");
        let result = lookup(&backend, "cat", None).await;
        assert!(matches!(result, Err(LookupError::MalformedJson(_))));
    }
}
