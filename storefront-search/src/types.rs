//! Data types for product search.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use storefront_core::Product;

use crate::errors::SearchError;

/// Retrieval strategy for a product query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Full-text matching on searchable fields
    Keyword,
    /// Nearest neighbours of the query embedding
    Vector,
    /// Full-text and vector query in one request
    #[default]
    Hybrid,
}

impl SearchStrategy {
    /// All strategies in display order.
    pub const ALL: [SearchStrategy; 3] = [Self::Keyword, Self::Vector, Self::Hybrid];

    /// Human-readable label for the search sidebar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Keyword => "Keyword search",
            Self::Vector => "Vector search",
            Self::Hybrid => "Hybrid search",
        }
    }

    /// Stable lowercase identifier used in URLs and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Vector => "vector",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SearchStrategy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keyword" | "text" => Ok(Self::Keyword),
            "vector" => Ok(Self::Vector),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(SearchError::InvalidStrategy {
                strategy: s.to_string(),
            }),
        }
    }
}

/// Searchable text field of the product index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchField {
    Name,
    Brand,
    Description,
    ImageCaption,
    ImageDescription,
    ImageTags,
}

impl SearchField {
    /// Every searchable field, in sidebar order.
    pub const ALL: [SearchField; 6] = [
        Self::Name,
        Self::Brand,
        Self::Description,
        Self::ImageCaption,
        Self::ImageDescription,
        Self::ImageTags,
    ];

    /// Field name as stored in the index.
    pub fn index_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Brand => "brand",
            Self::Description => "description",
            Self::ImageCaption => "imageCaption",
            Self::ImageDescription => "imageDescription",
            Self::ImageTags => "imageTags",
        }
    }

    /// Label shown next to the field checkbox.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Brand => "Brand",
            Self::Description => "Description",
            Self::ImageCaption => "Image caption",
            Self::ImageDescription => "Image description",
            Self::ImageTags => "Image tags",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index_name())
    }
}

impl FromStr for SearchField {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.index_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SearchError::InvalidField {
                field: s.to_string(),
            })
    }
}

/// Nearest-neighbour clause of an index query.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorQuery {
    pub vector: Vec<f32>,
    pub k_nearest_neighbors: usize,
    /// Vector field to compare against
    pub fields: String,
}

/// Request sent to a search index provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexQuery {
    /// Full-text query; `None` for pure vector queries
    pub search_text: Option<String>,
    /// Restricts full-text matching; empty means every searchable field
    pub search_fields: Vec<SearchField>,
    pub vector: Option<VectorQuery>,
    /// Fields returned for each hit
    pub select: Vec<&'static str>,
    pub top: usize,
}

/// Product returned by a query together with its relevance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "@search.score", default)]
    pub score: Option<f64>,
    #[serde(rename = "@search.rerankerScore", default)]
    pub reranker_score: Option<f64>,
}

impl ScoredProduct {
    /// Wraps a product without any relevance score.
    pub fn unscored(product: Product) -> Self {
        Self {
            product,
            score: None,
            reranker_score: None,
        }
    }

    /// Relevance score with four decimals, or `N/A`.
    pub fn score_label(&self) -> String {
        match self.score {
            Some(score) => format!("{score:.4}"),
            None => "N/A".to_string(),
        }
    }
}

/// Per-document result of an upload batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexingOutcome {
    pub key: String,
    #[serde(rename = "status")]
    pub succeeded: bool,
    pub status_code: u16,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("Hybrid".parse::<SearchStrategy>().unwrap(), SearchStrategy::Hybrid);
        assert_eq!("text".parse::<SearchStrategy>().unwrap(), SearchStrategy::Keyword);
        assert!(matches!(
            "semantic".parse::<SearchStrategy>(),
            Err(SearchError::InvalidStrategy { .. })
        ));
        assert_eq!(SearchStrategy::default(), SearchStrategy::Hybrid);
    }

    #[test]
    fn test_field_parsing_uses_index_names() {
        assert_eq!("imageTags".parse::<SearchField>().unwrap(), SearchField::ImageTags);
        assert_eq!("imagecaption".parse::<SearchField>().unwrap(), SearchField::ImageCaption);
        assert!("price".parse::<SearchField>().is_err());
    }

    #[test]
    fn test_scored_product_reads_search_annotations() {
        let hit: ScoredProduct = serde_json::from_value(json!({
            "@search.score": 0.0331,
            "@search.rerankerScore": null,
            "@search.highlights": {"name": ["<em>Wool</em> Coat"]},
            "id": "p-7",
            "name": "Wool Coat",
            "imageTags": null
        }))
        .unwrap();

        assert_eq!(hit.product.id, "p-7");
        assert_eq!(hit.score_label(), "0.0331");
        assert_eq!(hit.reranker_score, None);
        assert!(hit.product.image_tags.is_empty());
        assert!(hit.product.extra.is_empty());
    }

    #[test]
    fn test_indexing_outcome_shape() {
        let outcome: IndexingOutcome = serde_json::from_value(json!({
            "key": "p-1", "status": false, "errorMessage": "Invalid document", "statusCode": 400
        }))
        .unwrap();
        assert!(!outcome.succeeded);
        assert_eq!(outcome.status_code, 400);
        assert_eq!(outcome.error_message.as_deref(), Some("Invalid document"));
    }
}
