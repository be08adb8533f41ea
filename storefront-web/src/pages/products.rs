//! Products page - browse and search the catalog

use axum::extract::{Query, State};
use axum::response::Html;
use storefront_search::{SearchField, SearchStrategy};

use crate::components::{escape_html, layout};
use crate::htmx::{ListingParams, render_listing};
use crate::pages::render_page;
use crate::server::AppState;

fn search_sidebar(params: &ListingParams) -> String {
    let strategy_options: String = SearchStrategy::ALL
        .iter()
        .map(|strategy| {
            let selected = if *strategy == params.strategy {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{}"{selected}>{}</option>"#,
                strategy.as_str(),
                strategy.label()
            )
        })
        .collect();

    let field_checkboxes: String = SearchField::ALL
        .iter()
        .map(|field| {
            let checked = if params.fields.is_empty() || params.fields.contains(field) {
                " checked"
            } else {
                ""
            };
            format!(
                r#"<label class="flex items-center space-x-2 text-sm text-gray-300">
                    <input type="checkbox" name="fields" value="{}"{checked} class="rounded" />
                    <span>{}</span>
                </label>"#,
                field.index_name(),
                field.label()
            )
        })
        .collect();

    let form = format!(
        r##"<form hx-get="/htmx/products" hx-target="#product-listing" hx-swap="innerHTML"
                 hx-indicator="#listing-loading" class="space-y-5">
            <div>
                <label class="block text-sm font-medium text-gray-300 mb-2">Search strategy</label>
                <select name="strategy" class="w-full px-3 py-2 bg-gray-700 border border-gray-600 rounded-lg text-white">
                    {strategy_options}
                </select>
            </div>
            <div>
                <p class="text-sm font-medium text-gray-300 mb-2">Search fields</p>
                <div class="space-y-1">{field_checkboxes}</div>
            </div>
            {}
            <div class="grid grid-cols-2 gap-3">
                {}
                {}
            </div>
            <div id="listing-loading" class="htmx-indicator text-sm text-gray-400">Searching...</div>
        </form>
        <div class="mt-6 text-xs text-gray-500 space-y-1">
            <p>Tips</p>
            <p>• Search in natural language</p>
            <p>• Switch the search strategy</p>
            <p>• Narrow the searched fields</p>
        </div>"##,
        layout::input("q", "Enter a search query", &params.query, None),
        layout::button("Search", "primary", Some(r#"type="submit" name="action" value="search""#)),
        layout::button("Show all", "secondary", Some(r#"type="submit" name="action" value="all""#)),
    );

    layout::card(Some("Search settings"), &form)
}

/// Renders the products page with sidebar and listing.
pub async fn products_page(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Html<String> {
    let params = ListingParams::from_pairs(&pairs);
    let listing = render_listing(&state, &params).await;

    let subtitle = if params.is_search() {
        format!("Showing results for '{}'", escape_html(&params.query))
    } else {
        "Browse the catalog or search with keywords, vectors or both".to_string()
    };

    let content = format!(
        r#"{}
        <div class="grid grid-cols-1 lg:grid-cols-4 gap-8">
            <aside class="lg:col-span-1">{}</aside>
            <section id="product-listing" class="lg:col-span-3">{listing}</section>
        </div>"#,
        layout::page_header("Product Search", Some(&subtitle), None),
        search_sidebar(&params)
    );

    render_page("Products", "products", &content)
}
