//! Service wiring for each runtime mode.

use std::sync::Arc;

use storefront_core::{
    AzureOpenAiClient, ModelService, RuntimeMode, StorefrontConfig, StorefrontError,
};
use storefront_search::{
    AzureSearchProvider, ProductSearchService, SearchIndexProvider, SearchSettings,
    ShoppingAssistant,
};
use storefront_sim::{DeterministicModel, InMemoryCatalog};

/// Search service and assistant sharing one provider and model.
#[derive(Debug, Clone)]
pub struct ServiceStack {
    pub search: ProductSearchService,
    pub assistant: ShoppingAssistant,
}

impl ServiceStack {
    /// Builds the services for a runtime mode.
    ///
    /// Production talks to Azure AI Search and Azure OpenAI and requires a
    /// complete configuration. Development runs against the seeded in-memory
    /// catalog and the deterministic model.
    ///
    /// # Errors
    /// - `StorefrontError::Configuration` - Required production settings are missing
    /// - `StorefrontError::Model` - Model client cannot be created
    /// - `StorefrontError::Search` - Search provider cannot be created
    pub fn from_mode(config: &StorefrontConfig, mode: RuntimeMode) -> Result<Self, StorefrontError> {
        let (provider, model): (Arc<dyn SearchIndexProvider>, Arc<dyn ModelService>) = match mode {
            RuntimeMode::Production => {
                config.validate()?;
                let model = AzureOpenAiClient::from_config(&config.openai, &config.chat)?;
                let provider = AzureSearchProvider::from_config(&config.search)
                    .map_err(StorefrontError::from_search_error)?;
                (Arc::new(provider), Arc::new(model))
            }
            RuntimeMode::Development => {
                let model = DeterministicModel::new(config.openai.embedding_dimension);
                let catalog = InMemoryCatalog::seeded(&model);
                tracing::info!("Seeded in-memory catalog with {} products", catalog.len());
                (Arc::new(catalog), Arc::new(model))
            }
        };

        Ok(Self::from_parts(provider, model, config))
    }

    /// Builds the services over an explicit provider and model.
    pub fn from_parts(
        provider: Arc<dyn SearchIndexProvider>,
        model: Arc<dyn ModelService>,
        config: &StorefrontConfig,
    ) -> Self {
        let search =
            ProductSearchService::new(provider, model, SearchSettings::from(&config.search));
        let assistant = ShoppingAssistant::new(search.clone(), config.chat.history_window);
        Self { search, assistant }
    }
}

#[cfg(test)]
mod tests {
    use storefront_core::ServiceCredential;

    use super::*;

    #[test]
    fn test_production_requires_configuration() {
        let err = ServiceStack::from_mode(&StorefrontConfig::default(), RuntimeMode::Production)
            .unwrap_err();
        assert!(matches!(err, StorefrontError::Configuration { .. }));
    }

    #[test]
    fn test_missing_search_credential_is_configuration_error() {
        let mut config = StorefrontConfig::default();
        config.openai.endpoint = Some("https://example.openai.azure.com".to_string());
        config.openai.credential = Some(ServiceCredential::ApiKey("secret".to_string()));
        config.search.endpoint = Some("https://example.search.windows.net".to_string());

        let err = ServiceStack::from_mode(&config, RuntimeMode::Production).unwrap_err();
        assert!(err.is_user_error());
        assert!(err.to_string().contains("AZURE_SEARCH_API_KEY"));
    }

    #[test]
    fn test_development_uses_in_memory_catalog() {
        let stack =
            ServiceStack::from_mode(&StorefrontConfig::default(), RuntimeMode::Development)
                .unwrap();
        assert_eq!(stack.search.provider_name(), "in-memory");
    }
}
