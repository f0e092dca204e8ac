//! Response schemas sent to the model and the shape check applied to what
//! comes back.
//!
//! Schemas use the OpenAPI subset understood by `generateContent`
//! (`OBJECT`, `ARRAY`, `STRING`, ...). The same value drives
//! [`check_shape`], so the request and the validation cannot drift apart.

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

pub fn vocab_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "word": { "type": "STRING" },
            "phonetic": { "type": "STRING" },
            "definition": { "type": "STRING" },
            "importance": { "type": "STRING", "enum": ["high", "medium", "low"] }
        },
        "required": ["word", "definition", "importance"]
    })
}

pub fn segment_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "id": { "type": "STRING" },
            "originalText": { "type": "STRING" },
            "translatedText": { "type": "STRING" },
            "vocabulary": { "type": "ARRAY", "items": vocab_schema() }
        },
        "required": ["id", "originalText", "translatedText", "vocabulary"]
    })
}

pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "segments": { "type": "ARRAY", "items": segment_schema() }
        },
        "required": ["title", "segments"]
    })
}

pub fn word_detail_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "word": { "type": "STRING" },
            "phonetic": { "type": "STRING" },
            "definition": { "type": "STRING" },
            "partOfSpeech": { "type": "STRING" },
            "exampleSentence": { "type": "STRING" },
            "usageTips": { "type": "STRING" }
        },
        "required": ["word", "phonetic", "definition", "partOfSpeech", "exampleSentence", "usageTips"]
    })
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Response is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("Response violates schema at {path}: {message}")]
    SchemaViolation { path: String, message: String },
}

/// Parse model output, check it against `schema`, then deserialize.
pub fn decode<T: DeserializeOwned>(text: &str, schema: &Value) -> Result<T, DecodeError> {
    let value: Value = serde_json::from_str(text).map_err(DecodeError::MalformedJson)?;
    check_shape(&value, schema, "$")?;

    serde_json::from_value(value).map_err(|e| DecodeError::SchemaViolation {
        path: "$".to_string(),
        message: e.to_string(),
    })
}

/// Walk `value` against `schema`: types, required fields and string enums.
///
/// Properties not declared in the schema are ignored.
pub fn check_shape(value: &Value, schema: &Value, path: &str) -> Result<(), DecodeError> {
    let violation = |message: String| DecodeError::SchemaViolation {
        path: path.to_string(),
        message,
    };

    let expected = schema["type"].as_str().unwrap_or("");
    match expected {
        "OBJECT" => {
            let object = value
                .as_object()
                .ok_or_else(|| violation(format!("expected object, got {}", kind(value))))?;

            if let Some(required) = schema["required"].as_array() {
                for field in required.iter().filter_map(Value::as_str) {
                    match object.get(field) {
                        None | Some(Value::Null) => {
                            return Err(violation(format!("missing required field `{field}`")));
                        }
                        Some(_) => {}
                    }
                }
            }

            if let Some(properties) = schema["properties"].as_object() {
                for (name, property_schema) in properties {
                    match object.get(name) {
                        None | Some(Value::Null) => {}
                        Some(child) => {
                            check_shape(child, property_schema, &format!("{path}.{name}"))?
                        }
                    }
                }
            }
        }
        "ARRAY" => {
            let items = value
                .as_array()
                .ok_or_else(|| violation(format!("expected array, got {}", kind(value))))?;
            for (i, item) in items.iter().enumerate() {
                check_shape(item, &schema["items"], &format!("{path}[{i}]"))?;
            }
        }
        "STRING" => {
            let text = value
                .as_str()
                .ok_or_else(|| violation(format!("expected string, got {}", kind(value))))?;
            if let Some(allowed) = schema["enum"].as_array()
                && !allowed.iter().any(|a| a.as_str() == Some(text))
            {
                return Err(violation(format!("`{text}` is not one of {allowed:?}")));
            }
        }
        "NUMBER" | "INTEGER" => {
            if !value.is_number() {
                return Err(violation(format!("expected number, got {}", kind(value))));
            }
        }
        "BOOLEAN" => {
            if !value.is_boolean() {
                return Err(violation(format!("expected boolean, got {}", kind(value))));
            }
        }
        _ => {}
    }

    Ok(())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
