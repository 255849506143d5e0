//! Chat-completion client.
//!
//! - `client` - HTTP client for an OpenAI-compatible completion API
//! - `types` - request/response wire types

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;

pub use client::ApiClient;
pub use types::ChatMessage;

/// Backend that answers a chat prompt with a JSON document.
///
/// Implementations return the raw text of the model's answer; parsing and
/// validation happen in [`crate::analysis`].
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete_json(&self, messages: Vec<ChatMessage>) -> Result<String>;
}
