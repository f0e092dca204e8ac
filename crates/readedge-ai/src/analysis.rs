use std::collections::HashSet;

use readedge_types::ArticleAnalysis;

use crate::schema::{self, DecodeError};
use crate::{BackendError, GenerateRequest, GenerativeBackend};

const SYSTEM_INSTRUCTION: &str =
    "You are a helpful language learning assistant. Always return valid JSON.";

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Analysis request failed: {0}")]
    Backend(#[from] BackendError),

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Analysis response is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("Analysis response violates schema at {path}: {message}")]
    SchemaViolation { path: String, message: String },
}

impl From<DecodeError> for AnalysisError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::MalformedJson(e) => AnalysisError::MalformedJson(e),
            DecodeError::SchemaViolation { path, message } => {
                AnalysisError::SchemaViolation { path, message }
            }
        }
    }
}

/// Instruction for "analyze article"; the article is embedded verbatim
pub fn build_prompt(article_text: &str) -> String {
    format!(
        "You are an expert English tutor helping students read English articles intensively.
Analyze the following English text.
1. Create a short title for the content.
2. Split the text into logical reading segments (paragraphs or thematic blocks), keeping the original order.
3. Translate each segment into fluent Simplified Chinese.
4. For EACH segment, identify 3-5 key difficult words or phrases. Give each one its IPA phonetic symbol, a concise Chinese definition and an importance level (high, medium or low).

Input Text:
{article_text}
"
    )
}

pub fn build_request(article_text: &str) -> GenerateRequest {
    GenerateRequest {
        prompt: build_prompt(article_text),
        system_instruction: Some(SYSTEM_INSTRUCTION.to_string()),
        response_schema: schema::analysis_schema(),
    }
}

/// Segment, translate and extract vocabulary from an article in one call.
///
/// No retry: a single failure is returned as-is.
pub async fn analyze(
    backend: &dyn GenerativeBackend,
    article_text: &str,
) -> Result<ArticleAnalysis, AnalysisError> {
    tracing::info!("Analyzing article ({} chars)", article_text.len());

    let request = build_request(article_text);
    let text = backend
        .generate(&request)
        .await
        .inspect_err(|e| tracing::error!("Analysis failed: {}", e))?
        .filter(|text| !text.trim().is_empty())
        .ok_or(AnalysisError::EmptyResponse)?;

    let analysis: ArticleAnalysis = schema::decode(&text, &request.response_schema)
        .inspect_err(|e| tracing::error!("Analysis response rejected: {}", e))?;

    let mut seen = HashSet::new();
    for segment in &analysis.segments {
        if !seen.insert(segment.id.as_str()) {
            tracing::warn!("Duplicate segment id {:?} in analysis", segment.id);
        }
    }

    tracing::info!(
        "Analysis ready: {:?}, {} segments",
        analysis.title,
        analysis.segments.len()
    );

    Ok(analysis)
}
