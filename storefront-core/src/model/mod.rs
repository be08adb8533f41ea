//! Access to the managed model service for embeddings and chat completions.
//!
//! Inference happens entirely in the managed service. This module only
//! shapes requests and responses.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod azure;

pub use azure::AzureOpenAiClient;

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// Single message of a chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Per-request sampling overrides. `None` uses the configured default.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionOptions {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
            max_tokens: None,
        }
    }
}

/// Errors returned by the model service client.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Request could not be sent or the connection failed.
    #[error("Network error: {reason}")]
    NetworkError { reason: String },

    /// Service answered with a non-success status.
    #[error("Model service returned HTTP {status}: {reason}")]
    ApiError { status: u16, reason: String },

    /// Response body did not have the expected shape.
    #[error("Parse error: {reason}")]
    ParseError { reason: String },

    /// Response parsed but carried no embedding or message.
    #[error("Empty response from {operation}")]
    EmptyResponse { operation: &'static str },

    /// Embedding length differs from the index's vector dimension.
    #[error("Embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Client cannot be built from the current configuration.
    #[error("Model configuration error: {reason}")]
    Configuration { reason: String },
}

/// Embedding and chat completion backend.
///
/// Implemented by the Azure OpenAI client in production and by offline
/// stand-ins in development mode and tests.
#[async_trait]
pub trait ModelService: Send + Sync + std::fmt::Debug {
    /// Generates an embedding vector for the given text.
    ///
    /// # Errors
    /// - `ModelError::NetworkError` - Service unreachable
    /// - `ModelError::ApiError` - Service rejected the request
    /// - `ModelError::EmptyResponse` - No embedding returned
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError>;

    /// Generates the assistant reply for a conversation.
    ///
    /// # Errors
    /// - `ModelError::NetworkError` - Service unreachable
    /// - `ModelError::ApiError` - Service rejected the request
    /// - `ModelError::EmptyResponse` - No message content returned
    async fn complete_chat(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<String, ModelError>;

    /// Generates text for a single prompt under a system message.
    ///
    /// # Errors
    /// Same as [`ModelService::complete_chat`].
    async fn generate_text(
        &self,
        prompt: &str,
        system_message: &str,
        options: CompletionOptions,
    ) -> Result<String, ModelError> {
        let messages = [ChatMessage::system(system_message), ChatMessage::user(prompt)];
        self.complete_chat(&messages, options).await
    }
}

/// System message used when a caller has no persona of its own.
pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are a helpful assistant.";

/// Flattens newlines and trims text before it is embedded.
pub fn clean_embedding_input(text: &str) -> String {
    text.replace('\n', " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Default)]
    struct RecordingModel {
        seen: Mutex<Vec<ChatMessage>>,
    }

    #[async_trait]
    impl ModelService for RecordingModel {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, ModelError> {
            Ok(vec![0.0; 3])
        }

        async fn complete_chat(
            &self,
            messages: &[ChatMessage],
            _options: CompletionOptions,
        ) -> Result<String, ModelError> {
            self.seen.lock().unwrap().extend_from_slice(messages);
            Ok("ok".to_string())
        }
    }

    #[tokio::test]
    async fn test_generate_text_sends_system_then_user() {
        let model = RecordingModel::default();
        let reply = model
            .generate_text("Describe this shirt", DEFAULT_SYSTEM_MESSAGE, CompletionOptions::default())
            .await
            .unwrap();

        assert_eq!(reply, "ok");
        let seen = model.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ChatMessage::system(DEFAULT_SYSTEM_MESSAGE),
                ChatMessage::user("Describe this shirt"),
            ]
        );
    }

    #[test]
    fn test_clean_embedding_input() {
        assert_eq!(clean_embedding_input("  linen\nshirt \n"), "linen shirt");
    }

    #[test]
    fn test_chat_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
