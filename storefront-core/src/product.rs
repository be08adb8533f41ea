//! Product record and catalog files.
//!
//! The record mirrors the search index schema. Fields the index does not
//! define (category, attributes, stock, ...) are kept in `extra` so catalog
//! files survive a load/save cycle unchanged.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, StorefrontError};

/// A product as stored in the search index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_caption: Option<String>,
    #[serde(default)]
    pub image_description: Option<String>,
    #[serde(default, deserialize_with = "tags_or_empty")]
    pub image_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_vector: Option<Vec<f32>>,
    /// Non-index fields; `@`-prefixed index annotations are dropped
    #[serde(flatten, deserialize_with = "without_annotations")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Search responses annotate documents with `@search.*` keys.
fn without_annotations<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let mut fields = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
    fields.retain(|key, _| !key.starts_with('@'));
    Ok(fields)
}

/// The index returns `null` for unset collections.
fn tags_or_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Product {
    /// Creates a product with only an identifier and a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Product name, or `N/A` when the index has none.
    pub fn display_name(&self) -> &str {
        text_or_na(self.name.as_deref())
    }

    /// Brand, or `N/A` when the index has none.
    pub fn display_brand(&self) -> &str {
        text_or_na(self.brand.as_deref())
    }

    /// String value of a non-index field such as `category`.
    pub fn extra_text(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(|value| value.as_str())
    }
}

/// Returns the text, or `N/A` for missing or blank values.
pub fn text_or_na(text: Option<&str>) -> &str {
    match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => "N/A",
    }
}

/// Formats a price in won with thousands separators.
pub fn price_label(price: Option<f64>) -> String {
    let Some(price) = price.filter(|p| p.is_finite()) else {
        return "Price unavailable".to_string();
    };

    let rounded = price.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}₩{grouped}")
}

/// Truncates to `max_chars` characters, appending `...` when shortened.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut shortened: String = text.chars().take(max_chars).collect();
        shortened.push_str("...");
        shortened
    } else {
        text.to_string()
    }
}

/// Renders tags as `#a • #b`.
pub fn tags_label(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<_>>()
        .join(" • ")
}

/// Loads products from a JSON array file.
///
/// A missing file yields an empty catalog.
///
/// # Errors
/// - `StorefrontError::Io` - File exists but cannot be read
/// - `StorefrontError::Catalog` - File is not a JSON array of products
pub async fn load_products_from_json(path: &Path) -> Result<Vec<Product>> {
    if !tokio::fs::try_exists(path).await? {
        tracing::debug!("Catalog file {} not found, starting empty", path.display());
        return Ok(Vec::new());
    }

    let raw = tokio::fs::read_to_string(path).await?;
    let products: Vec<Product> =
        serde_json::from_str(&raw).map_err(|e| StorefrontError::Catalog {
            reason: format!("{}: {e}", path.display()),
        })?;

    tracing::debug!("Loaded {} products from {}", products.len(), path.display());
    Ok(products)
}

/// Saves products as a pretty-printed JSON array, creating parent directories.
///
/// # Errors
/// - `StorefrontError::Io` - Directory or file cannot be written
/// - `StorefrontError::Json` - Products cannot be serialized
pub async fn save_products_to_json(path: &Path, products: &[Product]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string_pretty(products)?;
    tokio::fs::write(path, json).await?;

    tracing::debug!("Saved {} products to {}", products.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_index_annotations_stay_out_of_extra() {
        let product: Product = serde_json::from_value(json!({
            "id": "p-7",
            "name": "Wool coat",
            "@search.highlights": {"description": ["<em>wool</em> coat"]},
            "@search.captions": null,
            "category": "outerwear"
        }))
        .unwrap();

        assert_eq!(product.extra.len(), 1);
        assert_eq!(product.extra_text("category"), Some("outerwear"));

        let echoed = serde_json::to_value(&product).unwrap();
        assert!(echoed.get("@search.highlights").is_none());
        assert_eq!(echoed["category"], "outerwear");
    }

    #[test]
    fn test_price_label() {
        assert_eq!(price_label(Some(39000.0)), "₩39,000");
        assert_eq!(price_label(Some(1_234_567.0)), "₩1,234,567");
        assert_eq!(price_label(Some(999.0)), "₩999");
        assert_eq!(price_label(Some(0.0)), "₩0");
        assert_eq!(price_label(None), "Price unavailable");
        assert_eq!(price_label(Some(f64::NAN)), "Price unavailable");
    }

    #[test]
    fn test_preview_counts_characters() {
        assert_eq!(preview("short", 80), "short");
        assert_eq!(preview("가나다라마", 3), "가나다...");
        assert_eq!(preview("abcd", 4), "abcd");
    }

    #[test]
    fn test_tags_label() {
        assert_eq!(
            tags_label(&["shirt".to_string(), "cotton".to_string()]),
            "#shirt • #cotton"
        );
        assert_eq!(tags_label(&[]), "");
    }

    #[test]
    fn test_product_json_uses_index_field_names() {
        let product: Product = serde_json::from_value(json!({
            "id": "p-1",
            "name": "Linen Shirt",
            "price": 39000,
            "imageUrl": "https://img.example/p-1.jpg",
            "imageTags": null,
            "category": "tops",
            "stock": 12
        }))
        .unwrap();

        assert_eq!(product.display_name(), "Linen Shirt");
        assert_eq!(product.display_brand(), "N/A");
        assert_eq!(product.price, Some(39000.0));
        assert!(product.image_tags.is_empty());
        assert_eq!(product.extra_text("category"), Some("tops"));

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["imageUrl"], "https://img.example/p-1.jpg");
        assert_eq!(value["stock"], 12);
        assert!(value.get("descriptionVector").is_none());
    }

    #[tokio::test]
    async fn test_catalog_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("products.json");

        assert!(load_products_from_json(&path).await.unwrap().is_empty());

        let mut product = Product::new("p-2", "니트 가디건");
        product.brand = Some("Maison".to_string());
        save_products_to_json(&path, &[product.clone()]).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("니트 가디건"));

        let loaded = load_products_from_json(&path).await.unwrap();
        assert_eq!(loaded, vec![product]);
    }

    #[tokio::test]
    async fn test_invalid_catalog_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"id\": 1}").unwrap();

        let err = load_products_from_json(&path).await.unwrap_err();
        assert!(matches!(err, StorefrontError::Catalog { .. }));
    }

    proptest! {
        #[test]
        fn prop_price_label_keeps_digits(price in 0u32..1_000_000_000) {
            let label = price_label(Some(f64::from(price)));
            let digits: String = label.chars().filter(|c| c.is_ascii_digit()).collect();
            prop_assert_eq!(digits, price.to_string());
        }

        #[test]
        fn prop_preview_never_exceeds_limit(text in ".{0,200}", max in 1usize..100) {
            let shortened = preview(&text, max);
            prop_assert!(shortened.chars().count() <= max + 3);
        }
    }
}
