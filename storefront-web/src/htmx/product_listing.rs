//! Product listing fragment: browsing, searching and pagination

use axum::extract::{Query, State};
use axum::response::Html;
use storefront_search::{ScoredProduct, SearchField, SearchStrategy};

use crate::components::{activity, escape_html, product};
use crate::server::AppState;

/// What the user asked the listing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListAction {
    /// Search when a query is present, otherwise browse
    #[default]
    Auto,
    /// Search button pressed
    Search,
    /// Show-all button pressed
    ShowAll,
}

/// Listing state carried in the query string.
///
/// Repeated `fields` parameters select searchable fields; none selected means
/// every field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListingParams {
    pub page: usize,
    pub query: String,
    pub strategy: SearchStrategy,
    pub fields: Vec<SearchField>,
    pub action: ListAction,
}

impl ListingParams {
    /// Parses query pairs, ignoring unknown or malformed values.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut params = Self {
            page: 1,
            ..Self::default()
        };

        for (key, value) in pairs {
            match key.as_str() {
                "page" => params.page = value.parse().unwrap_or(1),
                "q" => params.query = value.trim().to_string(),
                "strategy" => match value.parse() {
                    Ok(strategy) => params.strategy = strategy,
                    Err(e) => tracing::debug!("Ignoring strategy parameter: {}", e),
                },
                "fields" => match value.parse() {
                    Ok(field) if !params.fields.contains(&field) => params.fields.push(field),
                    Ok(_) => {}
                    Err(e) => tracing::debug!("Ignoring fields parameter: {}", e),
                },
                "action" => {
                    params.action = match value.as_str() {
                        "search" => ListAction::Search,
                        "all" => ListAction::ShowAll,
                        _ => ListAction::Auto,
                    }
                }
                _ => {}
            }
        }
        params
    }

    /// Whether the listing shows search results rather than the catalog.
    pub fn is_search(&self) -> bool {
        self.action != ListAction::ShowAll && !self.query.is_empty()
    }

    /// Fragment URL for another page of the same listing.
    pub fn page_link(&self, page: usize) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("page", &page.to_string());
        if self.is_search() {
            query.append_pair("q", &self.query);
            query.append_pair("strategy", self.strategy.as_str());
            for field in &self.fields {
                query.append_pair("fields", field.index_name());
            }
        }
        format!("/htmx/products?{}", query.finish())
    }
}

/// Renders the listing for `params`: notices, title and product grid.
pub async fn render_listing(state: &AppState, params: &ListingParams) -> String {
    let mut notices = Vec::new();

    if params.action == ListAction::Search && params.query.is_empty() {
        notices.push(activity::notification_toast(
            "Please enter a search query.",
            "warning",
            true,
        ));
    }

    let mut search_results: Option<Vec<ScoredProduct>> = None;
    if params.is_search() {
        match state
            .search
            .search(params.strategy, &params.query, &params.fields, None)
            .await
        {
            Ok(results) if results.is_empty() => {
                notices.push(activity::notification_toast(
                    "No search results.",
                    "warning",
                    true,
                ));
            }
            Ok(results) => {
                if params.action == ListAction::Search {
                    notices.push(activity::notification_toast(
                        &format!("Found {} products!", results.len()),
                        "success",
                        true,
                    ));
                }
                search_results = Some(results);
            }
            Err(e) => {
                tracing::warn!("Product search for '{}' failed: {}", params.query, e);
                notices.push(activity::notification_toast(
                    &format!("An error occurred while searching: {e}"),
                    "error",
                    true,
                ));
            }
        }
    }

    let (title, products, show_scores) = match search_results {
        Some(results) => (
            format!("Search results for '{}'", escape_html(&params.query)),
            results,
            true,
        ),
        None => {
            let products = match state.search.get_all_products(None).await {
                Ok(products) => {
                    if params.action == ListAction::ShowAll {
                        notices.push(activity::notification_toast(
                            &format!("Loaded {} products!", products.len()),
                            "success",
                            true,
                        ));
                    }
                    products
                }
                Err(e) => {
                    tracing::warn!("Loading products failed: {}", e);
                    notices.push(activity::notification_toast(
                        &format!("An error occurred while loading products: {e}"),
                        "error",
                        true,
                    ));
                    Vec::new()
                }
            };
            ("All products".to_string(), products, false)
        }
    };

    let grid = product::product_grid(
        &products,
        params.page,
        show_scores,
        &state.config.web,
        |page| params.page_link(page),
    );

    format!(
        r#"{}
        <h2 class="text-2xl font-semibold text-white mb-4">{title}</h2>
        {grid}"#,
        notices.join("\n")
    )
}

/// HTMX fragment handler for the product listing.
pub async fn product_listing(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Html<String> {
    let params = ListingParams::from_pairs(&pairs);
    Html(render_listing(&state, &params).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_params_parse_repeated_fields() {
        let params = ListingParams::from_pairs(&pairs(&[
            ("q", " coat "),
            ("strategy", "keyword"),
            ("fields", "name"),
            ("fields", "imageTags"),
            ("fields", "name"),
            ("fields", "price"),
            ("page", "2"),
        ]));

        assert_eq!(params.query, "coat");
        assert_eq!(params.strategy, SearchStrategy::Keyword);
        assert_eq!(params.fields, vec![SearchField::Name, SearchField::ImageTags]);
        assert_eq!(params.page, 2);
        assert!(params.is_search());
    }

    #[test]
    fn test_show_all_ignores_query() {
        let params = ListingParams::from_pairs(&pairs(&[("q", "coat"), ("action", "all")]));
        assert!(!params.is_search());
        assert_eq!(params.page_link(3), "/htmx/products?page=3");
    }

    #[test]
    fn test_page_link_keeps_search_state() {
        let params = ListingParams::from_pairs(&pairs(&[
            ("q", "warm coat"),
            ("fields", "brand"),
            ("page", "abc"),
        ]));
        assert_eq!(params.page, 1);
        assert_eq!(
            params.page_link(2),
            "/htmx/products?page=2&q=warm+coat&strategy=hybrid&fields=brand"
        );
    }
}
