//! Centralized configuration for Storefront.
//!
//! Every endpoint, deployment name and tunable lives here so the search,
//! model and web layers never read the environment on their own.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::{Result, StorefrontError};

/// Credential attached to outbound requests.
///
/// Keys and tokens are taken as provided; acquiring tokens is left to the
/// platform tooling.
#[derive(Clone, PartialEq, Eq)]
pub enum ServiceCredential {
    /// Sent as the `api-key` header.
    ApiKey(String),
    /// Sent as `Authorization: Bearer <token>`.
    BearerToken(String),
}

impl std::fmt::Debug for ServiceCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => write!(f, "ApiKey(***)"),
            Self::BearerToken(_) => write!(f, "BearerToken(***)"),
        }
    }
}

impl ServiceCredential {
    /// Header name and value to attach to a request.
    pub fn header(&self) -> (&'static str, String) {
        match self {
            Self::ApiKey(key) => ("api-key", key.clone()),
            Self::BearerToken(token) => ("Authorization", format!("Bearer {token}")),
        }
    }

    /// Short label for logs and the settings endpoint.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ApiKey(_) => "api-key",
            Self::BearerToken(_) => "bearer-token",
        }
    }

    fn from_pair(key: Option<String>, token: Option<String>) -> Option<Self> {
        key.map(Self::ApiKey).or_else(|| token.map(Self::BearerToken))
    }
}

/// Parses a service endpoint as a base URL.
///
/// A trailing slash is added so relative joins keep any path prefix.
///
/// # Errors
/// - `url::ParseError` - Endpoint is not an absolute URL
pub fn endpoint_base(endpoint: &str) -> std::result::Result<url::Url, url::ParseError> {
    if endpoint.ends_with('/') {
        url::Url::parse(endpoint)
    } else {
        url::Url::parse(&format!("{endpoint}/"))
    }
}

/// Central configuration for all Storefront components.
#[derive(Debug, Clone, Default)]
pub struct StorefrontConfig {
    pub openai: OpenAiConfig,
    pub search: SearchConfig,
    pub chat: ChatConfig,
    pub web: WebConfig,
}

/// Model service (Azure OpenAI) settings.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: Option<String>,
    pub credential: Option<ServiceCredential>,
    pub api_version: String,
    /// Deployment used for chat completions
    pub chat_deployment: String,
    /// Deployment reserved for image understanding
    pub vision_deployment: String,
    pub embedding_deployment: String,
    /// ada-002: 1536, text-embedding-3-large: 3072
    pub embedding_dimension: usize,
    pub request_timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            credential: None,
            api_version: "2024-10-21".to_string(),
            chat_deployment: "gpt-4".to_string(),
            vision_deployment: "gpt-4o".to_string(),
            embedding_deployment: "text-embedding-ada-002".to_string(),
            embedding_dimension: 1536,
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Search service (Azure AI Search) settings.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Service endpoint, e.g. `https://my-search.search.windows.net`
    pub endpoint: Option<String>,
    pub credential: Option<ServiceCredential>,
    pub index_name: String,
    pub api_version: String,
    /// Vector field queried by vector and hybrid search
    pub vector_field: String,
    /// Default result count for keyword, vector and hybrid search
    pub max_results: usize,
    /// Default result count when browsing the whole catalog
    pub browse_limit: usize,
    pub request_timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            credential: None,
            index_name: "products-index".to_string(),
            api_version: "2024-07-01".to_string(),
            vector_field: "descriptionVector".to_string(),
            max_results: 5,
            browse_limit: 100,
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Chat completion defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Number of most recent conversation messages forwarded to the model
    pub history_window: usize,
    /// Messages kept per chat session; older ones are dropped
    pub stored_messages: usize,
    /// Chat sessions kept in memory at once
    pub max_sessions: usize,
    /// Chat sessions unused for this long are dropped
    pub session_idle_timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
            history_window: 7,
            stored_messages: 50,
            max_sessions: 1000,
            session_idle_timeout: Duration::from_secs(30 * 60),
        }
    }
}

/// Web UI layout and server settings.
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub bind_address: SocketAddr,
    /// 3 rows x 3 products
    pub products_per_page: usize,
    pub grid_columns: usize,
    pub description_preview_chars: usize,
    pub caption_preview_chars: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
            products_per_page: 9,
            grid_columns: 3,
            description_preview_chars: 80,
            caption_preview_chars: 50,
        }
    }
}

impl StorefrontConfig {
    /// Creates configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary key lookup.
    ///
    /// Blank values count as unset. Unparseable numbers keep the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        config.openai.endpoint = get("AZURE_OPENAI_ENDPOINT");
        config.openai.credential = ServiceCredential::from_pair(
            get("AZURE_OPENAI_API_KEY"),
            get("AZURE_OPENAI_BEARER_TOKEN"),
        );
        if let Some(version) = get("AZURE_OPENAI_API_VERSION") {
            config.openai.api_version = version;
        }
        if let Some(name) = get("AZURE_OPENAI_DEPLOYMENT_NAME") {
            config.openai.chat_deployment = name;
        }
        if let Some(name) = get("AZURE_OPENAI_VISION_DEPLOYMENT_NAME") {
            config.openai.vision_deployment = name;
        }
        if let Some(name) = get("AZURE_OPENAI_EMBEDDING_DEPLOYMENT_NAME") {
            config.openai.embedding_deployment = name;
        }
        if let Some(raw) = get("EMBEDDING_DIMENSION") {
            match raw.parse::<usize>() {
                Ok(dimension) if dimension > 0 => config.openai.embedding_dimension = dimension,
                _ => tracing::warn!("Ignoring invalid EMBEDDING_DIMENSION={raw}"),
            }
        }

        config.search.endpoint = get("AZURE_SEARCH_SERVICE_ENDPOINT");
        config.search.credential = ServiceCredential::from_pair(
            get("AZURE_SEARCH_API_KEY"),
            get("AZURE_SEARCH_BEARER_TOKEN"),
        );
        if let Some(index) = get("AZURE_SEARCH_INDEX_NAME") {
            config.search.index_name = index;
        }
        if let Some(version) = get("AZURE_SEARCH_API_VERSION") {
            config.search.api_version = version;
        }

        if let Some(raw) = get("STOREFRONT_REQUEST_TIMEOUT") {
            match raw.parse::<u64>() {
                Ok(seconds) if seconds > 0 => {
                    config.openai.request_timeout = Duration::from_secs(seconds);
                    config.search.request_timeout = Duration::from_secs(seconds);
                }
                _ => tracing::warn!("Ignoring invalid STOREFRONT_REQUEST_TIMEOUT={raw}"),
            }
        }
        if let Some(raw) = get("STOREFRONT_BIND_ADDRESS") {
            match raw.parse::<SocketAddr>() {
                Ok(address) => config.web.bind_address = address,
                Err(e) => tracing::warn!("Ignoring invalid STOREFRONT_BIND_ADDRESS={raw}: {e}"),
            }
        }

        config
    }

    /// Names of required settings that are not configured.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.openai.endpoint.is_none() {
            missing.push("AZURE_OPENAI_ENDPOINT");
        }
        if self.openai.credential.is_none() {
            missing.push("AZURE_OPENAI_API_KEY");
        }
        if self.search.endpoint.is_none() {
            missing.push("AZURE_SEARCH_SERVICE_ENDPOINT");
        }
        if self.search.credential.is_none() {
            missing.push("AZURE_SEARCH_API_KEY");
        }
        missing
    }

    /// Validates the settings needed to talk to the cloud services.
    ///
    /// # Errors
    /// - `StorefrontError::Configuration` - One or more required settings are missing
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(StorefrontError::Configuration {
                reason: format!("Missing required configuration: {}", missing.join(", ")),
            })
        }
    }
}
