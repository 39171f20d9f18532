//! Chat types matching the front-end API surface.

use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Chat message in conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Incoming chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ConversationTurn>,
    /// Missing or `null` both mean "use retrieval".
    #[serde(default)]
    pub use_rag: Option<bool>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ConversationTurn>) -> Self {
        Self {
            messages,
            use_rag: None,
        }
    }

    pub fn with_rag(mut self, use_rag: bool) -> Self {
        self.use_rag = Some(use_rag);
        self
    }

    pub fn wants_retrieval(&self) -> bool {
        self.use_rag.unwrap_or(true)
    }
}

/// Provenance of retrieved material, passed through from the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub filepath: Option<String>,
}

/// Non-streaming chat response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_rag_defaults_to_true() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"messages":[{"role":"user","content":"hi"}]}"#).unwrap();
        assert!(req.wants_retrieval());

        let req: ChatRequest = serde_json::from_str(r#"{"messages":[],"use_rag":null}"#).unwrap();
        assert!(req.wants_retrieval());

        let req: ChatRequest = serde_json::from_str(r#"{"messages":[],"use_rag":false}"#).unwrap();
        assert!(!req.wants_retrieval());
    }

    #[test]
    fn test_unknown_role_rejected() {
        let res = serde_json::from_str::<ChatRequest>(
            r#"{"messages":[{"role":"tool","content":"x"}]}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_citation_tolerates_missing_and_extra_fields() {
        let c: Citation =
            serde_json::from_str(r#"{"title":"Report","url":"https://x","chunk_id":"3"}"#).unwrap();
        assert_eq!(c.title.as_deref(), Some("Report"));
        assert!(c.content.is_none());
        assert!(c.filepath.is_none());
    }

    #[test]
    fn test_response_always_serializes_citations() {
        let resp = ChatResponse {
            content: "hello".into(),
            citations: Vec::new(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["citations"], serde_json::json!([]));
    }
}
