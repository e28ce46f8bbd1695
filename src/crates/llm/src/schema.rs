//! Structured-generation response schemas.
//!
//! The gateway only ever requests one of a closed set of response shapes,
//! so the schema is a tagged enum rather than an optional free-form JSON
//! schema parameter: callers know at compile time which `GeneratedObject`
//! variant a successful call yields.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{LlmError, Result};

/// The response shape requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSchema {
    /// `{ code, fileName }`: a generated test file plus its target path.
    TestFile,
    /// `{ output }`: a plain string wrapper, the default shape.
    Text,
}

impl Default for ResponseSchema {
    fn default() -> Self {
        ResponseSchema::Text
    }
}

/// A generated test file as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedTestFile {
    pub code: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
}

/// A plain-text generation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedText {
    pub output: String,
}

/// Schema-validated output of one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedObject {
    TestFile(GeneratedTestFile),
    Text(GeneratedText),
}

impl ResponseSchema {
    /// Field names required by this shape, in wire order.
    fn fields(&self) -> &'static [&'static str] {
        match self {
            ResponseSchema::TestFile => &["code", "fileName"],
            ResponseSchema::Text => &["output"],
        }
    }

    /// Render a standard JSON schema (OpenAI `json_schema` response format).
    pub fn json_schema(&self) -> Value {
        let properties: serde_json::Map<String, Value> = self
            .fields()
            .iter()
            .map(|name| (name.to_string(), json!({ "type": "string" })))
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": self.fields(),
            "additionalProperties": false,
        })
    }

    /// Render the Gemini `responseSchema` flavor (upper-case type names,
    /// no `additionalProperties`).
    pub fn gemini_schema(&self) -> Value {
        let properties: serde_json::Map<String, Value> = self
            .fields()
            .iter()
            .map(|name| (name.to_string(), json!({ "type": "STRING" })))
            .collect();

        json!({
            "type": "OBJECT",
            "properties": properties,
            "required": self.fields(),
        })
    }

    /// Name reported to backends that label schemas.
    pub fn name(&self) -> &'static str {
        match self {
            ResponseSchema::TestFile => "test_file",
            ResponseSchema::Text => "text_output",
        }
    }

    /// Validate a backend's JSON object against this shape.
    pub fn parse(&self, value: Value) -> Result<GeneratedObject> {
        match self {
            ResponseSchema::TestFile => {
                let parsed: GeneratedTestFile = serde_json::from_value(value)
                    .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
                Ok(GeneratedObject::TestFile(parsed))
            }
            ResponseSchema::Text => {
                let parsed: GeneratedText = serde_json::from_value(value)
                    .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
                Ok(GeneratedObject::Text(parsed))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_file_schema_fields() {
        let schema = ResponseSchema::TestFile.json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["code"]["type"], "string");
        assert_eq!(schema["properties"]["fileName"]["type"], "string");
        assert_eq!(schema["required"][1], "fileName");
    }

    #[test]
    fn test_gemini_schema_uses_uppercase_types() {
        let schema = ResponseSchema::Text.gemini_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["output"]["type"], "STRING");
        assert!(schema.get("additionalProperties").is_none());
    }

    #[test]
    fn test_parse_test_file() {
        let value = json!({ "code": "package a", "fileName": "a_test.go" });
        let parsed = ResponseSchema::TestFile.parse(value).unwrap();
        match parsed {
            GeneratedObject::TestFile(file) => {
                assert_eq!(file.code, "package a");
                assert_eq!(file.file_name, "a_test.go");
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let value = json!({ "code": "package a" });
        let err = ResponseSchema::TestFile.parse(value).unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[test]
    fn test_default_shape_is_text() {
        assert_eq!(ResponseSchema::default(), ResponseSchema::Text);
        let value = json!({ "output": "hello" });
        let parsed = ResponseSchema::default().parse(value).unwrap();
        assert!(matches!(parsed, GeneratedObject::Text(_)));
    }
}
