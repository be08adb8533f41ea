//! Azure OpenAI REST client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, CompletionOptions, ModelError, ModelService, clean_embedding_input};
use crate::config::{ChatConfig, OpenAiConfig, ServiceCredential, endpoint_base};

/// Model service client for an Azure OpenAI resource.
///
/// Talks to the deployment-scoped REST endpoints directly. One client is
/// shared by every request; `reqwest::Client` pools connections internally.
#[derive(Debug, Clone)]
pub struct AzureOpenAiClient {
    client: reqwest::Client,
    endpoint: url::Url,
    credential: ServiceCredential,
    api_version: String,
    chat_deployment: String,
    embedding_deployment: String,
    embedding_dimension: usize,
    default_temperature: f32,
    default_max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Error envelope returned by Azure services.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl AzureOpenAiClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    /// - `ModelError::Configuration` - Endpoint or credential missing, or endpoint is not a URL
    pub fn from_config(openai: &OpenAiConfig, chat: &ChatConfig) -> Result<Self, ModelError> {
        let endpoint = openai
            .endpoint
            .as_deref()
            .ok_or_else(|| ModelError::Configuration {
                reason: "AZURE_OPENAI_ENDPOINT is not set".to_string(),
            })?;
        let credential = openai
            .credential
            .clone()
            .ok_or_else(|| ModelError::Configuration {
                reason: "AZURE_OPENAI_API_KEY is not set".to_string(),
            })?;

        let client = reqwest::Client::builder()
            .timeout(openai.request_timeout)
            .build()
            .map_err(|e| ModelError::Configuration {
                reason: format!("HTTP client setup failed: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint: parse_endpoint(endpoint)?,
            credential,
            api_version: openai.api_version.clone(),
            chat_deployment: openai.chat_deployment.clone(),
            embedding_deployment: openai.embedding_deployment.clone(),
            embedding_dimension: openai.embedding_dimension,
            default_temperature: chat.temperature,
            default_max_tokens: chat.max_tokens,
        })
    }

    fn deployment_url(&self, deployment: &str, operation: &str) -> Result<url::Url, ModelError> {
        let mut url = self
            .endpoint
            .join(&format!("openai/deployments/{deployment}/{operation}"))
            .map_err(|e| ModelError::Configuration {
                reason: format!("Invalid deployment URL: {e}"),
            })?;
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }

    async fn post_json<B, R>(&self, url: url::Url, body: &B) -> Result<R, ModelError>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let (header, value) = self.credential.header();
        tracing::debug!("POST {}", url.path());

        let response = self
            .client
            .post(url)
            .header(header, value)
            .json(body)
            .send()
            .await
            .map_err(|e| ModelError::NetworkError {
                reason: format!("Azure OpenAI request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            tracing::warn!("Azure OpenAI returned HTTP {}: {}", status, reason);
            return Err(ModelError::ApiError {
                status: status.as_u16(),
                reason,
            });
        }

        response.json().await.map_err(|e| ModelError::ParseError {
            reason: format!("Azure OpenAI JSON parsing failed: {e}"),
        })
    }
}

fn parse_endpoint(endpoint: &str) -> Result<url::Url, ModelError> {
    endpoint_base(endpoint).map_err(|e| ModelError::Configuration {
        reason: format!("Invalid endpoint '{endpoint}': {e}"),
    })
}

#[async_trait]
impl ModelService for AzureOpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        let cleaned = clean_embedding_input(text);
        let url = self.deployment_url(&self.embedding_deployment, "embeddings")?;

        let request = EmbeddingRequest {
            input: [cleaned.as_str()],
        };
        let response: EmbeddingResponse = self.post_json(url, &request).await?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .ok_or(ModelError::EmptyResponse {
                operation: "embeddings",
            })?;

        if embedding.len() != self.embedding_dimension {
            return Err(ModelError::DimensionMismatch {
                expected: self.embedding_dimension,
                actual: embedding.len(),
            });
        }

        Ok(embedding)
    }

    async fn complete_chat(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<String, ModelError> {
        let url = self.deployment_url(&self.chat_deployment, "chat/completions")?;
        let request = ChatCompletionRequest {
            messages,
            temperature: options.temperature.unwrap_or(self.default_temperature),
            max_tokens: options.max_tokens.unwrap_or(self.default_max_tokens),
        };

        let response: ChatCompletionResponse = self.post_json(url, &request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ModelError::EmptyResponse {
                operation: "chat completions",
            })
    }
}
