//! Single-call relay to the chat completion provider.

use std::sync::Arc;
use std::time::Duration;

use mentor_core::{Error, RelayConfig, Result};
use reqwest::Client;
use tracing::{error, info, warn};

use crate::prompts::{DEFAULT_SYSTEM_PROMPT, ROLE_INFORMATION};
use crate::types::{ChatRequest, ChatResponse, Role};
use crate::wire::{
    CompletionRequest, CompletionResponse, DataSource, ErrorBody, SearchAuthentication,
    SearchParameters, WireMessage,
};

/// Upper bound on one provider round trip.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const GENERIC_PROVIDER_ERROR: &str = "API Error";

/// Forwards conversations to the completion provider.
///
/// Holds the immutable configuration and one pooled HTTP client; safe to share
/// across concurrent requests.
pub struct ChatRelay {
    config: Arc<RelayConfig>,
    client: Client,
}

impl ChatRelay {
    pub fn new(config: Arc<RelayConfig>) -> Result<Self> {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(config: Arc<RelayConfig>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Arc<RelayConfig> {
        &self.config
    }

    /// Chat completion URL for the configured deployment, if an endpoint is set.
    pub fn completions_url(&self) -> Option<String> {
        self.config.openai_endpoint.as_deref().map(|endpoint| {
            format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                endpoint, self.config.deployment, self.config.api_version
            )
        })
    }

    /// Send one conversation to the provider and project the answer.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let (_, api_key) = self
            .config
            .provider_credentials()
            .ok_or_else(|| Error::Config("Azure OpenAI not configured".into()))?;
        let url = self
            .completions_url()
            .ok_or_else(|| Error::Config("Azure OpenAI not configured".into()))?;

        let body = self.build_request(request);

        info!("Sending chat completion request to {}", url);
        if body.data_sources.is_some() {
            info!(
                "Retrieval settings: query_type={}, strictness={}, in_scope={}",
                self.config.query_type, self.config.strictness, self.config.in_scope
            );
        }

        let response = self
            .client
            .post(&url)
            .header("api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let raw = match response.text().await {
                Ok(raw) => raw,
                Err(e) if e.is_timeout() => return Err(transport_error(e)),
                Err(e) => {
                    warn!("Failed to read provider error body: {}", e);
                    String::new()
                }
            };
            error!("Provider returned {}: {}", status, raw);
            let message =
                ErrorBody::message_from(&raw).unwrap_or_else(|| GENERIC_PROVIDER_ERROR.into());
            return Err(Error::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let raw = response.bytes().await.map_err(transport_error)?;
        let completion: CompletionResponse = serde_json::from_slice(&raw)?;

        project_response(completion)
    }

    /// Assemble the outbound body: system prompt, caller turns, optional data source.
    pub fn build_request<'a>(&'a self, request: &'a ChatRequest) -> CompletionRequest<'a> {
        CompletionRequest {
            messages: self.build_messages(request),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            data_sources: self.retrieval_source(request).map(|ds| vec![ds]),
        }
    }

    fn build_messages<'a>(&'a self, request: &'a ChatRequest) -> Vec<WireMessage<'a>> {
        let system_prompt = self
            .config
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);

        std::iter::once(WireMessage {
            role: Role::System,
            content: system_prompt,
        })
        .chain(request.messages.iter().map(|turn| WireMessage {
            role: turn.role,
            content: &turn.content,
        }))
        .collect()
    }

    /// Search data source, attached only when the caller asks for retrieval,
    /// retrieval is enabled and a search endpoint is configured.
    fn retrieval_source<'a>(&'a self, request: &ChatRequest) -> Option<DataSource<'a>> {
        if !request.wants_retrieval() || !self.config.rag_enabled {
            return None;
        }
        let endpoint = self.config.search_endpoint.as_deref()?;

        Some(DataSource {
            kind: "azure_search",
            parameters: SearchParameters {
                endpoint,
                index_name: self.config.search_index.as_deref(),
                authentication: SearchAuthentication {
                    kind: "api_key",
                    key: self.config.search_api_key.as_deref(),
                },
                query_type: self.config.query_type,
                strictness: self.config.strictness,
                in_scope: self.config.in_scope,
                top_n_documents: self.config.top_n_documents,
                role_information: ROLE_INFORMATION,
            },
        })
    }
}

fn transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        warn!("Provider request timed out: {}", e);
        Error::Timeout
    } else {
        Error::Http(format!("Request failed: {}", e))
    }
}

fn project_response(completion: CompletionResponse) -> Result<ChatResponse> {
    let message = completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| Error::Internal("Provider response contained no choices".into()))?;

    let content = message
        .content
        .ok_or_else(|| Error::Internal("Provider response contained no content".into()))?;

    Ok(ChatResponse {
        content,
        citations: message.context.map(|ctx| ctx.citations).unwrap_or_default(),
    })
}
