//! Provider wire format for chat completions with an optional search data source.

use mentor_core::QueryType;
use serde::{Deserialize, Serialize};

use crate::types::{Citation, Role};

/// Outbound chat completion body.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub messages: Vec<WireMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_sources: Option<Vec<DataSource<'a>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WireMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}

/// Retrieval augmentation block.
#[derive(Debug, Serialize)]
pub struct DataSource<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub parameters: SearchParameters<'a>,
}

#[derive(Debug, Serialize)]
pub struct SearchParameters<'a> {
    pub endpoint: &'a str,
    pub index_name: Option<&'a str>,
    pub authentication: SearchAuthentication<'a>,
    pub query_type: QueryType,
    pub strictness: u8,
    pub in_scope: bool,
    pub top_n_documents: u32,
    pub role_information: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SearchAuthentication<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub key: Option<&'a str>,
}

/// Successful completion payload; only the fields the relay reads.
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub context: Option<MessageContext>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessageContext {
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// Error payload returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Best-effort `error.message` from a raw provider body.
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .and_then(|e| e.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            ErrorBody::message_from(r#"{"error":{"code":"429","message":"rate limited"}}"#),
            Some("rate limited".to_string())
        );
        assert_eq!(ErrorBody::message_from(r#"{"error":{}}"#), None);
        assert_eq!(ErrorBody::message_from("<html>bad gateway</html>"), None);
    }

    #[test]
    fn test_completion_without_context() {
        let resp: CompletionResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"Hi"}}]}"#,
        )
        .unwrap();
        assert_eq!(resp.choices[0].message.content.as_deref(), Some("Hi"));
        assert!(resp.choices[0].message.context.is_none());
    }

    #[test]
    fn test_context_without_citations() {
        let resp: CompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"Hi","context":{"intent":"[]"}}}]}"#,
        )
        .unwrap();
        let ctx = resp.choices[0].message.context.as_ref().unwrap();
        assert!(ctx.citations.is_empty());
    }
}
