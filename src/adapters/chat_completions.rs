use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::config::RemoteConfig;
use crate::domain::{AnalysisRequest, DomainError};
use crate::ports::{AnalysisClient, HttpClient};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Analysis client for OpenAI-compatible chat-completions endpoints.
pub struct ChatCompletionsClient<H: HttpClient> {
    http: Arc<H>,
    endpoint: String,
    model: String,
    api_key: Option<Zeroizing<String>>,
}

impl<H: HttpClient> ChatCompletionsClient<H> {
    pub fn new(
        http: Arc<H>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<Zeroizing<String>>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
        }
    }

    /// Build a client from configuration, reading the key from the configured variable.
    pub fn from_config(http: Arc<H>, config: &RemoteConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Zeroizing::new);

        if api_key.is_none() {
            info!(
                variable = %config.api_key_env,
                "API key not set; remote analysis unavailable"
            );
        }

        Self::new(http, &config.endpoint, &config.model, api_key)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl<H: HttpClient> AnalysisClient for ChatCompletionsClient<H> {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<String, DomainError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            DomainError::Config("API key for the remote model service is not set".to_string())
        })?;

        let body = ChatCompletionBody {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            max_tokens = request.max_tokens,
            "Sending chat completion request"
        );

        let response: ChatCompletionResponse = self
            .http
            .post_json(&self.endpoint, Some(api_key.as_str()), &body, request.timeout)
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| DomainError::RemoteAnalysis("response contained no completion".to_string()))
    }
}
