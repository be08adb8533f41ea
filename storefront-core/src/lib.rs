//! Storefront Core - configuration, product model and model-service access
//!
//! This crate provides the building blocks shared by every Storefront crate:
//! environment-driven configuration, the product record and its catalog
//! files, the chat/embedding model client, and product authoring helpers.

pub mod authoring;
pub mod config;
pub mod mode;
pub mod model;
pub mod product;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use authoring::{DescriptionLength, ProductAuthor, ProductDraft, Tone};
pub use config::{ServiceCredential, StorefrontConfig};
pub use mode::RuntimeMode;
pub use model::{
    AzureOpenAiClient, ChatMessage, ChatRole, CompletionOptions, ModelError, ModelService,
};
pub use product::Product;

/// Errors that can bubble up from any Storefront subsystem.
///
/// High-level error types representing failures in core functionality.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    #[error("Model service error: {0}")]
    Model(#[from] ModelError),

    #[error("Search error: {reason}")]
    Search { reason: String },

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Catalog file error: {reason}")]
    Catalog { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Web UI error: {reason}")]
    WebUI { reason: String },
}

impl StorefrontError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            StorefrontError::Model(e) => match e {
                ModelError::NetworkError { .. } => {
                    "Could not reach the model service".to_string()
                }
                ModelError::ApiError { status, .. } => {
                    format!("Model service rejected the request (HTTP {status})")
                }
                _ => "Model service error occurred".to_string(),
            },
            StorefrontError::Search { reason } => format!("Search failed: {reason}"),
            StorefrontError::Configuration { reason } => reason.clone(),
            StorefrontError::Catalog { reason } => format!("Catalog file problem: {reason}"),
            StorefrontError::Io(_) => "File system error occurred".to_string(),
            StorefrontError::Json(_) => "Invalid JSON data".to_string(),
            StorefrontError::WebUI { reason } => format!("Web interface error: {reason}"),
        }
    }

    /// Checks if this error is due to user input or local setup.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            StorefrontError::Configuration { .. }
                | StorefrontError::Catalog { .. }
                | StorefrontError::Json(_)
        )
    }

    /// Wraps any displayable search failure.
    pub fn from_search_error(error: impl std::fmt::Display) -> Self {
        StorefrontError::Search {
            reason: error.to_string(),
        }
    }

    /// Wraps any displayable web server failure.
    pub fn from_web_ui_error(error: impl std::fmt::Display) -> Self {
        StorefrontError::WebUI {
            reason: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_is_user_error() {
        let err = StorefrontError::Configuration {
            reason: "Missing required configuration: AZURE_OPENAI_ENDPOINT".to_string(),
        };
        assert!(err.is_user_error());
        assert_eq!(
            err.user_message(),
            "Missing required configuration: AZURE_OPENAI_ENDPOINT"
        );
    }

    #[test]
    fn test_model_error_message_hides_details() {
        let err = StorefrontError::from(ModelError::ApiError {
            status: 401,
            reason: "Access denied due to invalid subscription key".to_string(),
        });
        assert!(!err.is_user_error());
        assert_eq!(
            err.user_message(),
            "Model service rejected the request (HTTP 401)"
        );
    }
}
