//! OpenRouter Provider Implementation
//!
//! Talks to the OpenRouter chat-completions API, which fronts many hosted
//! models behind an OpenAI-compatible request shape.
//!
//! # Features
//!
//! - Blocking HTTP communication (one request per completion, no retries)
//! - Configurable endpoint, model and timeout
//! - JSON mode via `response_format: {"type": "json_object"}`
//!
//! # Examples
//!
//! ```no_run
//! use calllog_llm::OpenRouterProvider;
//! use calllog_domain::traits::LlmProvider;
//!
//! let provider = OpenRouterProvider::new("sk-or-...", "openai/gpt-4o-mini").unwrap();
//! let json = provider.generate_json("Reply in JSON.", "Say hello").unwrap();
//! ```

use crate::LlmError;
use calllog_domain::traits::LlmProvider as LlmProviderTrait;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default OpenRouter API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// OpenRouter chat-completions provider
pub struct OpenRouterProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: Client,
}

/// Request body for the chat-completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Response from the chat-completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl OpenRouterProvider {
    /// Create a new OpenRouter provider
    ///
    /// # Errors
    ///
    /// Returns `LlmError::MissingApiKey` if `api_key` is blank.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key,
            client: Client::new(),
        })
    }

    /// Point the provider at a different API base URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Apply a request timeout instead of the HTTP client's default
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;
        Ok(self)
    }

    /// Model identifier in use
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one chat completion and return the first choice's content
    fn chat(&self, system: &str, prompt: &str, json_mode: bool) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint);

        let request_body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: prompt },
            ],
            response_format: json_mode.then_some(ResponseFormat { kind: "json_object" }),
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!("HTTP {}: {}", status, error_text)));
        }

        let chat_response: ChatResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("Response has no message content".to_string()))
    }
}

impl LlmProviderTrait for OpenRouterProvider {
    type Error = LlmError;

    fn generate(&self, system: &str, prompt: &str) -> Result<String, Self::Error> {
        self.chat(system, prompt, false)
    }

    fn generate_json(&self, system: &str, prompt: &str) -> Result<String, Self::Error> {
        self.chat(system, prompt, true)
    }
}
