//! HTTP client for an OpenAI-compatible chat-completion API.

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use super::types::*;
use super::CompletionService;
use crate::config::CompletionConfig;
use crate::error::{Error, Result};
use crate::VERSION;

/// User agent string for API requests.
fn user_agent() -> String {
    format!("codiny-server/{} (rust)", VERSION)
}

/// API client for the completion service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    /// Handle API response, extracting errors.
    async fn handle_response(&self, response: Response) -> Result<ChatCompletionResponse> {
        let status = response.status();

        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or("Unknown");
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(status.as_u16(), status_text, body));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Completion(format!("Failed to decode completion envelope: {}", e)))
    }
}

#[async_trait]
impl CompletionService for ApiClient {
    async fn complete_json(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let request_id = Uuid::new_v4().to_string();

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            response_format: ResponseFormat::json_object(),
        };

        debug!(request_id = %request_id, model = %self.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("X-Request-Id", &request_id)
            .json(&request)
            .send()
            .await?;

        let completion = self.handle_response(response).await?;
        completion
            .first_content()
            .map(String::from)
            .ok_or_else(|| Error::ResponseParse("completion contained no message content".to_string()))
    }
}
