pub mod http;
pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::consts::FALLBACK_ANSWER;

/// The body POSTed to the orchestrator for every user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub text: String,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_code: Option<String>,
}

/// Why a webhook call produced no answer.
///
/// The `Display` text is what the user sees in place of an answer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The webhook answered with something other than 200.
    #[error("Error: Status {0}")]
    Status(u16),
    /// The request never completed (DNS, refused, timeout, ...).
    #[error("Connection failed: {0}")]
    Connection(String),
    /// A 200 whose body is not JSON.
    #[error("Connection failed: {0}")]
    Decode(String),
}

/// The other end of the conversation. Could be the real orchestrator or a
/// test script.
#[async_trait]
pub trait Webhook: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<String, DispatchError>;
}

#[async_trait]
impl<W: Webhook + ?Sized> Webhook for Arc<W> {
    async fn send(&self, request: &ChatRequest) -> Result<String, DispatchError> {
        (**self).send(request).await
    }
}

/// Pull the answer out of a webhook response body.
///
/// Strings are taken verbatim, other values as their JSON text. A missing
/// or null field yields [`FALLBACK_ANSWER`].
pub fn extract_answer(body: &Value, field: &str) -> String {
    match body.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => FALLBACK_ANSWER.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_uses_camel_case_keys() {
        let request = ChatRequest {
            text: "hi".to_string(),
            session_id: "abc".to_string(),
            access_code: Some("code".to_string()),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"text": "hi", "sessionId": "abc", "accessCode": "code"})
        );
    }

    #[test]
    fn request_omits_missing_access_code() {
        let request = ChatRequest {
            text: "hi".to_string(),
            session_id: "abc".to_string(),
            access_code: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("accessCode").is_none());
    }

    #[test]
    fn extract_string_answer() {
        let body = json!({"Bot Answer": "Rust and Go"});
        assert_eq!(extract_answer(&body, "Bot Answer"), "Rust and Go");
    }

    #[test]
    fn extract_missing_field_falls_back() {
        let body = json!({"output": "wrong key"});
        assert_eq!(extract_answer(&body, "Bot Answer"), FALLBACK_ANSWER);
    }

    #[test]
    fn extract_null_falls_back() {
        let body = json!({"Bot Answer": null});
        assert_eq!(extract_answer(&body, "Bot Answer"), FALLBACK_ANSWER);
    }

    #[test]
    fn extract_non_object_body_falls_back() {
        let body = json!(["Bot Answer"]);
        assert_eq!(extract_answer(&body, "Bot Answer"), FALLBACK_ANSWER);
    }

    #[test]
    fn extract_non_string_is_rendered_as_json() {
        let body = json!({"Bot Answer": 42});
        assert_eq!(extract_answer(&body, "Bot Answer"), "42");
        let body = json!({"Bot Answer": {"a": 1}});
        assert_eq!(extract_answer(&body, "Bot Answer"), r#"{"a":1}"#);
    }

    #[test]
    fn extract_custom_field() {
        let body = json!({"output": "hello"});
        assert_eq!(extract_answer(&body, "output"), "hello");
    }

    #[test]
    fn error_text_matches_what_users_see() {
        assert_eq!(DispatchError::Status(500).to_string(), "Error: Status 500");
        assert_eq!(
            DispatchError::Connection("refused".to_string()).to_string(),
            "Connection failed: refused"
        );
        assert_eq!(
            DispatchError::Decode("expected value".to_string()).to_string(),
            "Connection failed: expected value"
        );
    }
}
