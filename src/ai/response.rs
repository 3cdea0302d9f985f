//! Decoding of chat and completion payloads.
//!
//! The endpoint answers with loosely-shaped JSON whatever the HTTP status,
//! so the decoded result keeps the raw payload and says which shape it
//! found instead of failing.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// The expected text was found.
    Success { content: String, raw: Value },
    /// The payload carries an `error` object (bad key, rate limit, ...).
    ApiError {
        message: String,
        error_type: Option<String>,
        raw: Value,
    },
    /// Valid JSON in neither the success nor the error shape.
    Unrecognized(Value),
    /// The body was not JSON at all.
    Undecodable(String),
}

impl ApiResponse {
    /// Decodes a `/chat/completions` body (`choices[0].message.content`).
    #[must_use]
    pub fn from_chat_body(body: &str) -> Self {
        Self::decode(body, |raw| {
            raw.pointer("/choices/0/message/content")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
    }

    /// Decodes a `/completions` body (`choices[0].text`).
    #[must_use]
    pub fn from_completion_body(body: &str) -> Self {
        Self::decode(body, |raw| {
            raw.pointer("/choices/0/text")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
    }

    fn decode(body: &str, extract: impl Fn(&Value) -> Option<String>) -> Self {
        let raw: Value = match serde_json::from_str(body) {
            Ok(raw) => raw,
            Err(_) => return ApiResponse::Undecodable(body.to_string()),
        };

        if let Some(content) = extract(&raw) {
            return ApiResponse::Success { content, raw };
        }

        if let Some(error) = raw.get("error").filter(|e| !e.is_null()) {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| error.as_str().map(str::to_string))
                .unwrap_or_else(|| error.to_string());
            let error_type = error
                .get("type")
                .and_then(Value::as_str)
                .map(str::to_string);
            return ApiResponse::ApiError {
                message,
                error_type,
                raw,
            };
        }

        ApiResponse::Unrecognized(raw)
    }

    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match self {
            ApiResponse::Success { content, .. } => Some(content),
            _ => None,
        }
    }

    #[must_use]
    pub fn raw(&self) -> Option<&Value> {
        match self {
            ApiResponse::Success { raw, .. } | ApiResponse::ApiError { raw, .. } => Some(raw),
            ApiResponse::Unrecognized(raw) => Some(raw),
            ApiResponse::Undecodable(_) => None,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_success_shape() {
        let body = r#"{"id":"x","choices":[{"message":{"role":"assistant","content":"Hola, ¿cómo estás?"}}]}"#;
        let response = ApiResponse::from_chat_body(body);
        assert!(response.is_success());
        assert_eq!(response.content(), Some("Hola, ¿cómo estás?"));
        assert_eq!(response.raw().unwrap()["id"], "x");
    }

    #[test]
    fn completion_success_shape() {
        let body = r#"{"choices":[{"text":"\n1. Fortran"}]}"#;
        let response = ApiResponse::from_completion_body(body);
        assert_eq!(response.content(), Some("\n1. Fortran"));
    }

    #[test]
    fn error_payload_is_not_a_success() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        match ApiResponse::from_chat_body(body) {
            ApiResponse::ApiError {
                message, error_type, ..
            } => {
                assert_eq!(message, "Incorrect API key provided");
                assert_eq!(error_type.as_deref(), Some("invalid_request_error"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn chat_body_is_not_a_completion() {
        let body = r#"{"choices":[{"message":{"content":"hi"}}]}"#;
        assert!(matches!(
            ApiResponse::from_completion_body(body),
            ApiResponse::Unrecognized(_)
        ));
    }

    #[test]
    fn non_json_body() {
        let response = ApiResponse::from_chat_body("<html>502 Bad Gateway</html>");
        assert_eq!(
            response,
            ApiResponse::Undecodable("<html>502 Bad Gateway</html>".to_string())
        );
        assert!(response.raw().is_none());
    }
}
