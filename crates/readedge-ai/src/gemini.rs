use async_trait::async_trait;
use readedge_config::gemini::GeminiConfig;
use serde::Serialize;
use serde_json::Value;

use crate::{BackendError, GenerateRequest, GenerativeBackend};

#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            model: config.model.clone(),
        })
    }

    /// `{api_url}/models/{model}:generateContent`
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

fn request_body(request: &GenerateRequest) -> GenerateContentBody<'_> {
    GenerateContentBody {
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part {
                text: &request.prompt,
            }],
        }],
        system_instruction: request.system_instruction.as_deref().map(|text| Content {
            role: None,
            parts: vec![Part { text }],
        }),
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: &request.response_schema,
        },
    }
}

/// Concatenated text parts of the first candidate, if any
fn response_text(json: &Value) -> Option<String> {
    let parts = json["candidates"]
        .get(0)
        .and_then(|c| c["content"]["parts"].as_array())?;

    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.is_empty() { None } else { Some(text) }
}

fn error_message(json: &Value) -> Option<&str> {
    json["error"]["message"].as_str()
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<Option<String>, BackendError> {
        if self.api_key.is_empty() {
            return Err(BackendError::AuthenticationError);
        }

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(request))
            .send()
            .await?;

        let status = response.status();

        if status == 429 {
            return Err(BackendError::RateLimitExceeded);
        }

        if status == 401 || status == 403 {
            return Err(BackendError::AuthenticationError);
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| BackendError::ApiError(format!("Failed to parse response: {}", e)))?;

        if !status.is_success() {
            return Err(BackendError::ApiError(match error_message(&json) {
                Some(message) => format!("HTTP {}: {}", status, message),
                None => format!("HTTP {}", status),
            }));
        }

        if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
            tracing::warn!("Prompt blocked by provider: {}", reason);
        }

        Ok(response_text(&json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(api_url: &str) -> GeminiClient {
        let config = GeminiConfig {
            api_key: "key".to_string(),
            api_url: api_url.to_string(),
            ..GeminiConfig::default()
        };
        GeminiClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            client("https://generativelanguage.googleapis.com/v1beta/").endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerateRequest {
            prompt: "Analyze".to_string(),
            system_instruction: Some("Be JSON".to_string()),
            response_schema: json!({"type": "OBJECT"}),
        };

        let body = serde_json::to_value(request_body(&request)).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Analyze");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be JSON");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_request_body_without_system_instruction() {
        let request = GenerateRequest {
            prompt: "Define".to_string(),
            system_instruction: None,
            response_schema: json!({}),
        };
        let body = serde_json::to_value(request_body(&request)).unwrap();
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_response_text_joins_parts() {
        let json = json!({
            "candidates": [{"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}}]
        });
        assert_eq!(response_text(&json).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_response_text_missing() {
        assert_eq!(response_text(&json!({"candidates": []})), None);
        assert_eq!(response_text(&json!({"promptFeedback": {"blockReason": "SAFETY"}})), None);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let client = GeminiClient::new(&GeminiConfig::default()).unwrap();
        let request = GenerateRequest {
            prompt: String::new(),
            system_instruction: None,
            response_schema: json!({}),
        };
        assert!(matches!(
            client.generate(&request).await,
            Err(BackendError::AuthenticationError)
        ));
    }
}
