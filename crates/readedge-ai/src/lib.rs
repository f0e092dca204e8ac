pub mod analysis;
pub mod gemini;
pub mod lookup;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod schema;

use std::sync::Arc;

use readedge_types::{ArticleAnalysis, WordDetail};

pub use analysis::AnalysisError;
pub use gemini::GeminiClient;
pub use lookup::LookupError;

/// Generative model provider interface
#[async_trait::async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Run one prompt constrained to a JSON response schema.
    ///
    /// `Ok(None)` means the provider answered but produced no text.
    async fn generate(&self, request: &GenerateRequest) -> Result<Option<String>, BackendError>;
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub response_schema: serde_json::Value,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,
}

/// Article analysis and word lookup over one backend
#[derive(Clone)]
pub struct StudyAssistant {
    backend: Arc<dyn GenerativeBackend>,
}

impl StudyAssistant {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { backend }
    }

    pub async fn analyze(&self, article_text: &str) -> Result<ArticleAnalysis, AnalysisError> {
        analysis::analyze(self.backend.as_ref(), article_text).await
    }

    pub async fn lookup(
        &self,
        word: &str,
        context_sentence: Option<&str>,
    ) -> Result<WordDetail, LookupError> {
        lookup::lookup(self.backend.as_ref(), word, context_sentence).await
    }
}
