//! Product authoring: marketing descriptions and index embeddings.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{CompletionOptions, ModelError, ModelService};
use crate::product::{Product, text_or_na};

/// Copywriter persona used for description generation.
pub const COPYWRITER_SYSTEM_MESSAGE: &str = "You are an e-commerce copywriter. \
You write appealing, persuasive product descriptions.";

/// Sampling temperature for description generation.
const DESCRIPTION_TEMPERATURE: f32 = 0.7;

/// Attributes always listed in the description prompt.
const PROMPT_ATTRIBUTES: [(&str, &str); 4] = [
    ("color", "Color"),
    ("material", "Material"),
    ("style", "Style"),
    ("season", "Season"),
];

/// Structured facts about a product that has no description yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Target length of a generated description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DescriptionLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl DescriptionLength {
    fn guide(self) -> &'static str {
        match self {
            Self::Short => "2-3 sentences, around 100 characters",
            Self::Medium => "5-7 sentences, 200-300 characters",
            Self::Long => "10 or more sentences, 500 characters or more",
        }
    }
}

/// Writing tone of a generated description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Tone {
    Casual,
    #[default]
    Professional,
    Luxury,
}

impl Tone {
    fn guide(self) -> &'static str {
        match self {
            Self::Casual => "friendly and relaxed",
            Self::Professional => "expert and trustworthy",
            Self::Luxury => "refined and elegant",
        }
    }
}

/// Builds the user prompt asking for a product description.
pub fn build_description_prompt(
    draft: &ProductDraft,
    length: DescriptionLength,
    tone: Tone,
) -> String {
    let name = draft.name.as_deref().unwrap_or("Product");
    let category = draft.category.as_deref().unwrap_or("");

    let mut facts = vec![
        format!("- Name: {name}"),
        format!("- Category: {category}"),
    ];
    for (key, label) in PROMPT_ATTRIBUTES {
        let value = text_or_na(draft.attributes.get(key).map(String::as_str));
        facts.push(format!("- {label}: {value}"));
    }
    let features = if draft.features.is_empty() {
        "N/A".to_string()
    } else {
        draft.features.join(", ")
    };
    facts.push(format!("- Features: {features}"));

    format!(
        "Write an appealing, detailed description for the following product.\n\
         \n\
         [Product information]\n\
         {}\n\
         \n\
         [Writing guide]\n\
         - Length: {}\n\
         - Tone: {}\n\
         - Naturally highlight the product's strengths and uses\n\
         - Use wording that makes shoppers want to buy\n\
         \n\
         Reply with the product description only:",
        facts.join("\n"),
        length.guide(),
        tone.guide()
    )
}

/// Text embedded into `descriptionVector` for a product.
///
/// Joins name, brand, description, category, `key: value` attributes and
/// features, skipping empty parts.
pub fn embedding_text(product: &Product) -> String {
    let mut parts: Vec<String> = [
        product.name.as_deref(),
        product.brand.as_deref(),
        product.description.as_deref(),
        product.extra_text("category"),
    ]
    .into_iter()
    .flatten()
    .map(str::to_string)
    .collect();

    if let Some(attributes) = product.extra.get("attributes").and_then(|v| v.as_object()) {
        for (key, value) in attributes {
            let value = value
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string());
            parts.push(format!("{key}: {value}"));
        }
    }

    if let Some(features) = product.extra.get("features").and_then(|v| v.as_array()) {
        parts.extend(features.iter().filter_map(|f| f.as_str()).map(str::to_string));
    }

    parts
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generates descriptions and embeddings for catalog entries.
#[derive(Debug, Clone)]
pub struct ProductAuthor {
    model: Arc<dyn ModelService>,
}

impl ProductAuthor {
    pub fn new(model: Arc<dyn ModelService>) -> Self {
        Self { model }
    }

    /// Generates a marketing description for a draft.
    ///
    /// # Errors
    /// - `ModelError` - Chat completion failed
    pub async fn generate_description(
        &self,
        draft: &ProductDraft,
        length: DescriptionLength,
        tone: Tone,
    ) -> Result<String, ModelError> {
        let prompt = build_description_prompt(draft, length, tone);
        let description = self
            .model
            .generate_text(
                &prompt,
                COPYWRITER_SYSTEM_MESSAGE,
                CompletionOptions::with_temperature(DESCRIPTION_TEMPERATURE),
            )
            .await?;

        Ok(description.trim().to_string())
    }

    /// Computes and stores the product's `descriptionVector`.
    ///
    /// # Errors
    /// - `ModelError` - Embedding request failed
    pub async fn embed_product(&self, product: &mut Product) -> Result<(), ModelError> {
        let text = embedding_text(product);
        tracing::debug!("Embedding product {} ({} chars)", product.id, text.len());
        product.description_vector = Some(self.model.embed(&text).await?);
        Ok(())
    }
}
