//! Shopping assistant grounded in search results.
//!
//! Each user turn runs a hybrid search with the user's message, hands the
//! best match to the model as context and returns the model's reply along
//! with the recommended product.

use serde::Serialize;
use storefront_core::product::{price_label, text_or_na};
use storefront_core::{ChatMessage, CompletionOptions};

use crate::errors::SearchError;
use crate::service::ProductSearchService;
use crate::types::{ScoredProduct, SearchField, SearchStrategy};

/// Persona prompt for product recommendations.
pub const ASSISTANT_SYSTEM_PROMPT: &str = "You are a friendly e-commerce product recommendation assistant.
Based on the retrieved product information, recommend and explain the product naturally and kindly in answer to the user's question.
Describe the product's features, strengths and the occasions it suits in concrete terms while keeping a natural conversational tone.
Also mention the price and the brand.";

/// Reply used when the search finds nothing.
pub const NO_RESULTS_REPLY: &str = "Sorry, I couldn't find any products related to your request. \
Could you try asking again with different keywords?";

/// Assistant answer for one user turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantReply {
    pub content: String,
    /// Product the reply is grounded in
    pub product: Option<ScoredProduct>,
}

/// Retrieval-augmented product recommender.
#[derive(Debug, Clone)]
pub struct ShoppingAssistant {
    search: ProductSearchService,
    history_window: usize,
}

impl ShoppingAssistant {
    /// Creates an assistant that forwards the last `history_window` messages.
    pub fn new(search: ProductSearchService, history_window: usize) -> Self {
        Self {
            search,
            history_window,
        }
    }

    /// Answers the latest user message of `conversation`.
    ///
    /// `conversation` holds prior user and assistant messages and ends with
    /// the new user message.
    ///
    /// # Errors
    /// - `SearchError::EmptyQuery` - Latest message is blank or missing
    /// - `SearchError::Model` - Embedding or chat completion failed
    /// - `SearchError::SearchFailed` - Index rejected the query
    pub async fn respond(&self, conversation: &[ChatMessage]) -> Result<AssistantReply, SearchError> {
        let prompt = conversation
            .last()
            .map(|message| message.content.as_str())
            .unwrap_or_default();

        let results = self
            .search
            .search(SearchStrategy::Hybrid, prompt, &SearchField::ALL, None)
            .await?;

        let Some(top) = results.into_iter().next() else {
            tracing::info!("No products matched chat message");
            return Ok(AssistantReply {
                content: NO_RESULTS_REPLY.to_string(),
                product: None,
            });
        };
        tracing::debug!("Grounding reply in product {}", top.product.id);

        let messages = self.build_messages(&top, conversation);
        let content = self
            .search
            .model()
            .complete_chat(&messages, CompletionOptions::default())
            .await?;

        Ok(AssistantReply {
            content,
            product: Some(top),
        })
    }

    fn build_messages(&self, top: &ScoredProduct, conversation: &[ChatMessage]) -> Vec<ChatMessage> {
        let recent_start = conversation.len().saturating_sub(self.history_window);
        let mut messages = vec![
            ChatMessage::system(ASSISTANT_SYSTEM_PROMPT),
            ChatMessage::system(product_context(top)),
        ];
        messages.extend_from_slice(&conversation[recent_start..]);
        messages
    }
}

/// Context block describing the recommended product.
pub fn product_context(hit: &ScoredProduct) -> String {
    let product = &hit.product;
    let tags = if product.image_tags.is_empty() {
        "N/A".to_string()
    } else {
        product.image_tags.join(", ")
    };

    format!(
        "[Recommended product]\n\
         - Name: {}\n\
         - Brand: {}\n\
         - Price: {}\n\
         - Description: {}\n\
         - Image caption: {}\n\
         - Image description: {}\n\
         - Tags: {}\n\
         - Relevance score: {}\n",
        product.display_name(),
        product.display_brand(),
        price_label(product.price),
        text_or_na(product.description.as_deref()),
        text_or_na(product.image_caption.as_deref()),
        text_or_na(product.image_description.as_deref()),
        tags,
        hit.score_label()
    )
}
