//! Chat transcript and input components

use storefront_core::ChatRole;
use storefront_core::product::{price_label, tags_label, text_or_na};
use storefront_search::ScoredProduct;
use uuid::Uuid;

use super::{activity, escape_html, layout};
use crate::sessions::ConversationEntry;

/// Expandable detail block for a recommended product.
fn product_details(hit: &ScoredProduct) -> String {
    let product = &hit.product;
    let image_html = product
        .image_url
        .as_deref()
        .map(|url| {
            format!(
                r#"<img src="{}" alt="" class="w-full max-w-sm rounded-lg mb-4" />"#,
                escape_html(url)
            )
        })
        .unwrap_or_default();

    let optional_section = |label: &str, value: Option<&str>| {
        value
            .filter(|v| !v.is_empty())
            .map(|v| {
                format!(
                    r#"<p class="font-semibold mt-3">{label}</p><p class="text-gray-300">{}</p>"#,
                    escape_html(v)
                )
            })
            .unwrap_or_default()
    };

    let tags = tags_label(&product.image_tags);
    let score_html = hit
        .score
        .map(|_| {
            format!(
                r#"<p class="text-xs text-gray-400 mt-3 pt-3 border-t border-gray-700">★ Search relevance: {}</p>"#,
                hit.score_label()
            )
        })
        .unwrap_or_default();

    format!(
        r#"<details class="mt-4 bg-gray-900 rounded-lg p-4">
            <summary class="cursor-pointer text-store-400">View product details</summary>
            <div class="mt-4 text-sm">
                {image_html}
                <p><span class="font-semibold">Name:</span> {name}</p>
                <p><span class="font-semibold">Brand:</span> {brand}</p>
                <p><span class="font-semibold">Price:</span> {price}</p>
                <p class="font-semibold mt-3 pt-3 border-t border-gray-700">Description</p>
                <p class="text-gray-300">{description}</p>
                {caption}
                {image_description}
                {tags}
                {score_html}
            </div>
        </details>"#,
        name = escape_html(product.display_name()),
        brand = escape_html(product.display_brand()),
        price = price_label(product.price),
        description = escape_html(text_or_na(product.description.as_deref())),
        caption = optional_section("Image caption", product.image_caption.as_deref()),
        image_description =
            optional_section("Image description", product.image_description.as_deref()),
        tags = optional_section("Tags", Some(tags.as_str())),
    )
}

/// Renders one chat message bubble.
pub fn chat_message(entry: &ConversationEntry) -> String {
    let content = escape_html(&entry.content);
    match entry.role {
        ChatRole::User => format!(
            r#"<div class="flex justify-end" data-role="user">
                <div class="max-w-2xl bg-store-600 text-white rounded-lg px-4 py-3 whitespace-pre-wrap">{content}</div>
            </div>"#
        ),
        _ => {
            let (heading, details) = match &entry.product {
                Some(hit) => (
                    format!(
                        r#"<h4 class="text-lg font-semibold text-white mb-2 pb-2 border-b border-gray-700">Recommended: {}</h4>"#,
                        escape_html(hit.product.display_name())
                    ),
                    product_details(hit),
                ),
                None => (String::new(), String::new()),
            };
            format!(
                r#"<div class="flex justify-start" data-role="assistant">
                    <div class="max-w-2xl bg-gray-800 border border-gray-700 text-gray-100 rounded-lg px-4 py-3">
                        {heading}
                        <div class="whitespace-pre-wrap">{content}</div>
                        {details}
                    </div>
                </div>"#
            )
        }
    }
}

/// Renders the whole transcript, or a greeting when it is empty.
pub fn chat_transcript(entries: &[ConversationEntry]) -> String {
    if entries.is_empty() {
        return activity::empty_state(
            "👋",
            "Hello! Ask me anything about our products.",
            Some("Try \"a warm coat for winter\" or \"white sneakers\"."),
        );
    }

    let messages: String = entries.iter().map(chat_message).collect();
    format!(r#"<div class="space-y-4">{messages}</div>"#)
}

/// Renders the message input bound to a chat session.
pub fn chat_form(session: Uuid) -> String {
    format!(
        r##"<form hx-post="/htmx/chat/send" hx-target="#chat-messages" hx-swap="innerHTML"
                 hx-indicator="#chat-loading" hx-on::after-request="this.reset()"
                 class="flex space-x-4 mt-6">
            <input type="hidden" name="session_id" value="{session}" />
            {}
            {}
        </form>
        <div id="chat-loading" class="htmx-indicator text-sm text-gray-400 mt-2">Searching products...</div>"##,
        layout::input("message", "Type a message...", "", Some("autocomplete=\"off\" required")),
        layout::button("Send", "primary", Some("type=\"submit\"")),
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use storefront_core::Product;

    use super::*;

    fn entry(role: ChatRole, content: &str, product: Option<ScoredProduct>) -> ConversationEntry {
        ConversationEntry {
            role,
            content: content.to_string(),
            product,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_assistant_message_with_product() {
        let mut product = Product::new("p-1", "Wool Coat");
        product.image_tags = vec!["coat".to_string()];
        let hit = ScoredProduct {
            product,
            score: Some(0.25),
            reranker_score: None,
        };

        let html = chat_message(&entry(ChatRole::Assistant, "Try this <coat>", Some(hit)));
        assert!(html.contains("Recommended: Wool Coat"));
        assert!(html.contains("Try this &lt;coat&gt;"));
        assert!(html.contains("#coat"));
        assert!(html.contains("Price unavailable"));
        assert!(html.contains("0.2500"));
    }

    #[test]
    fn test_plain_messages() {
        let html = chat_transcript(&[
            entry(ChatRole::User, "hi", None),
            entry(ChatRole::Assistant, "hello", None),
        ]);
        assert!(html.contains(r#"data-role="user""#));
        assert!(!html.contains("Recommended:"));
    }

    #[test]
    fn test_empty_transcript_greets() {
        assert!(chat_transcript(&[]).contains("Ask me anything"));
    }
}
