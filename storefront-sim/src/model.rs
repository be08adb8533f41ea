//! Deterministic model service for development mode.

use async_trait::async_trait;
use storefront_core::model::clean_embedding_input;
use storefront_core::{ChatMessage, ChatRole, CompletionOptions, ModelError, ModelService};

/// Offline model producing repeatable embeddings and replies.
///
/// Embeddings are hashed bag-of-words vectors normalized to unit length, so
/// texts sharing words end up close under cosine similarity.
#[derive(Debug, Clone)]
pub struct DeterministicModel {
    dimension: usize,
}

impl DeterministicModel {
    /// Creates a model emitting vectors of `dimension` components.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    /// Vector length produced by [`DeterministicModel::embed_text`].
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embeds text synchronously.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in tokenize(&clean_embedding_input(text)) {
            let bucket = (fnv1a(token.as_bytes()) % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

/// Lowercase alphanumeric words.
pub(crate) fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(*byte)).wrapping_mul(PRIME))
}

/// Value of the first `- Name: ...` line in any message.
fn named_product(messages: &[ChatMessage]) -> Option<&str> {
    messages
        .iter()
        .flat_map(|message| message.content.lines())
        .find_map(|line| line.trim().strip_prefix("- Name: "))
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "N/A")
}

#[async_trait]
impl ModelService for DeterministicModel {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        Ok(self.embed_text(text))
    }

    async fn complete_chat(
        &self,
        messages: &[ChatMessage],
        _options: CompletionOptions,
    ) -> Result<String, ModelError> {
        let user_message = messages
            .iter()
            .rev()
            .find(|message| message.role == ChatRole::User)
            .ok_or(ModelError::EmptyResponse {
                operation: "chat completions",
            })?;
        let request = user_message.content.lines().next().unwrap_or_default().trim();

        // Description prompts carry a product information block
        if user_message.content.contains("[Product information]") {
            let name = named_product(messages).unwrap_or("This product");
            return Ok(format!(
                "{name} brings comfort and style together. \
                 Made for everyday wear, it pairs easily with the rest of your wardrobe."
            ));
        }

        let reply = match named_product(messages) {
            Some(name) => format!(
                "{name} is a good match for \"{request}\". \
                 It is a versatile piece that is easy to style for everyday wear."
            ),
            None => format!("Here is what I can tell you about \"{request}\"."),
        };
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_embedding_is_deterministic() {
        let model = DeterministicModel::new(32);
        assert_eq!(model.embed_text("Linen shirt"), model.embed_text("linen SHIRT"));
        assert_eq!(model.embed_text("anything").len(), 32);
    }

    #[test]
    fn test_shared_words_are_closer() {
        let model = DeterministicModel::new(256);
        let query = model.embed_text("white linen shirt");
        let shirt = model.embed_text("Relaxed linen shirt in white");
        let boots = model.embed_text("Leather chelsea boots");
        assert!(cosine(&query, &shirt) > cosine(&query, &boots));
    }

    #[test]
    fn test_blank_text_embeds_to_zero_vector() {
        let model = DeterministicModel::new(8);
        assert!(model.embed_text("  \n ").iter().all(|v| *v == 0.0));
    }

    #[tokio::test]
    async fn test_reply_mentions_product_from_context() {
        let model = DeterministicModel::new(8);
        let messages = [
            ChatMessage::system("persona"),
            ChatMessage::system("[Recommended product]\n- Name: Wool Coat\n- Brand: Northwind"),
            ChatMessage::user("something warm"),
        ];
        let reply = model
            .complete_chat(&messages, CompletionOptions::default())
            .await
            .unwrap();
        assert!(reply.starts_with("Wool Coat is a good match for \"something warm\""));
    }

    #[tokio::test]
    async fn test_reply_requires_user_message() {
        let model = DeterministicModel::new(8);
        let err = model
            .complete_chat(&[ChatMessage::system("persona")], CompletionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::EmptyResponse { .. }));
    }

    proptest! {
        #[test]
        fn prop_embeddings_are_unit_or_zero(text in "[a-z ]{0,60}") {
            let vector = DeterministicModel::new(16).embed_text(&text);
            let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
            prop_assert!(norm == 0.0 || (norm - 1.0).abs() < 1e-4);
        }
    }
}
