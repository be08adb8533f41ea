//! Product card, grid and pagination components

use storefront_core::config::WebConfig;
use storefront_core::product::{preview, price_label, tags_label};
use storefront_search::ScoredProduct;

use super::{activity, escape_html, layout};

const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x300?text=No+Image";

/// Visible slice of a product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
    /// 1-based page number, clamped to the available pages
    pub page: usize,
    pub total_pages: usize,
    pub start: usize,
    pub end: usize,
}

/// Computes the slice shown for `requested` page of `total` items.
pub fn paginate(total: usize, per_page: usize, requested: usize) -> PageSlice {
    let per_page = per_page.max(1);
    let total_pages = total.div_ceil(per_page);
    let page = requested.clamp(1, total_pages.max(1));
    let start = ((page - 1) * per_page).min(total);
    let end = (start + per_page).min(total);

    PageSlice {
        page,
        total_pages,
        start,
        end,
    }
}

/// Renders a single product card.
pub fn product_card(hit: &ScoredProduct, show_score: bool, web: &WebConfig) -> String {
    let product = &hit.product;
    let name = escape_html(product.display_name());
    let image_url = escape_html(product.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE));

    let score_html = match hit.score {
        Some(_) if show_score => format!(
            r#"<p class="text-xs text-yellow-400 mt-1" data-score>★ Relevance: {}</p>"#,
            hit.score_label()
        ),
        _ => String::new(),
    };

    let description_html = product
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| escape_html(&preview(d, web.description_preview_chars)))
        .unwrap_or_default();

    let caption_html = product
        .image_caption
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(|c| escape_html(&preview(c, web.caption_preview_chars)))
        .unwrap_or_default();

    let tags_html = escape_html(&tags_label(&product.image_tags));

    let details_html = product
        .image_description
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|d| {
            format!(
                r#"<details class="mt-3 text-sm text-gray-300">
                    <summary class="cursor-pointer text-store-400">Details</summary>
                    <p class="mt-2">{}</p>
                </details>"#,
                escape_html(d)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div class="bg-gray-800 border border-gray-700 rounded-lg overflow-hidden flex flex-col" data-product-id="{id}">
            <img src="{image_url}" alt="{name}" class="w-full h-72 object-cover" loading="lazy" />
            <div class="p-4 flex-1 flex flex-col">
                <h4 class="font-semibold text-white">{name}</h4>
                <div class="flex justify-between text-sm text-gray-400 mt-1">
                    <span>{brand}</span>
                    <span>{price}</span>
                </div>
                {score_html}
                <p class="text-sm text-gray-300 mt-2 h-16 overflow-hidden">{description_html}</p>
                <p class="text-sm text-gray-400 mt-2 pt-2 border-t border-gray-700 h-12 overflow-hidden">{caption_html}</p>
                <p class="text-xs text-store-400 mt-2 pt-2 border-t border-gray-700 h-14 overflow-hidden">{tags_html}</p>
                {details_html}
            </div>
        </div>"#,
        id = escape_html(&product.id),
        brand = escape_html(product.display_brand()),
        price = price_label(product.price),
    )
}

/// Renders previous/next controls. `link_for` maps a page number to its fragment URL.
pub fn pagination(slice: PageSlice, link_for: impl Fn(usize) -> String) -> String {
    let nav_button = |label: &str, target: usize, disabled: bool| {
        let attrs = if disabled {
            "disabled".to_string()
        } else {
            format!(
                r##"hx-get="{}" hx-target="#product-listing" hx-swap="innerHTML""##,
                escape_html(&link_for(target))
            )
        };
        layout::button(label, "secondary", Some(&attrs))
    };

    format!(
        r#"<div class="flex items-center justify-between mt-8 pt-6 border-t border-gray-700">
            {}
            <h4 class="text-lg text-gray-300">Page {} / {}</h4>
            {}
        </div>"#,
        nav_button("◀ Previous", slice.page.saturating_sub(1), slice.page <= 1),
        slice.page,
        slice.total_pages,
        nav_button("Next ▶", slice.page + 1, slice.page >= slice.total_pages)
    )
}

/// Renders one page of products with a count header and pagination.
pub fn product_grid(
    products: &[ScoredProduct],
    requested_page: usize,
    show_scores: bool,
    web: &WebConfig,
    link_for: impl Fn(usize) -> String,
) -> String {
    if products.is_empty() {
        return activity::empty_state("🛍", "No products to display.", None);
    }

    let slice = paginate(products.len(), web.products_per_page, requested_page);
    let cards: String = products[slice.start..slice.end]
        .iter()
        .map(|hit| product_card(hit, show_scores, web))
        .collect();

    format!(
        r#"<h3 class="text-xl font-semibold text-white mb-4">{} products | page {}/{}</h3>
        {}
        {}"#,
        products.len(),
        slice.page,
        slice.total_pages,
        layout::grid(web.grid_columns, &cards),
        pagination(slice, link_for)
    )
}

#[cfg(test)]
mod tests {
    use storefront_core::Product;

    use super::*;

    fn hits(count: usize) -> Vec<ScoredProduct> {
        (0..count)
            .map(|i| ScoredProduct {
                product: Product::new(format!("p-{i}"), format!("Item {i}")),
                score: Some(0.5),
                reranker_score: None,
            })
            .collect()
    }

    #[test]
    fn test_paginate_clamps_page() {
        assert_eq!(
            paginate(20, 9, 7),
            PageSlice {
                page: 3,
                total_pages: 3,
                start: 18,
                end: 20
            }
        );
        assert_eq!(paginate(20, 9, 0).page, 1);
        assert_eq!(paginate(0, 9, 4), PageSlice { page: 1, total_pages: 0, start: 0, end: 0 });
    }

    #[test]
    fn test_card_escapes_index_text() {
        let mut hit = hits(1).remove(0);
        hit.product.name = Some("<script>alert(1)</script>".to_string());
        hit.product.price = Some(39000.0);

        let html = product_card(&hit, false, &WebConfig::default());
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("₩39,000"));
        assert!(!html.contains("data-score"));
    }

    #[test]
    fn test_card_truncates_previews() {
        let mut hit = hits(1).remove(0);
        hit.product.description = Some("x".repeat(100));
        let html = product_card(&hit, true, &WebConfig::default());
        assert!(html.contains(&format!("{}...", "x".repeat(80))));
        assert!(html.contains("Relevance: 0.5000"));
    }

    #[test]
    fn test_grid_shows_one_page() {
        let html = product_grid(&hits(10), 2, false, &WebConfig::default(), |p| {
            format!("/htmx/products?page={p}")
        });
        assert!(html.contains("10 products | page 2/2"));
        assert_eq!(html.matches("data-product-id=").count(), 1);
        assert!(html.contains(r#"hx-get="/htmx/products?page=1""#));
    }
}
