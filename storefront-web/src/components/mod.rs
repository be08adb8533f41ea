//! Reusable HTML components for HTMX + Tailwind UI
//!
//! Components are server-rendered HTML fragments that can be used
//! in full pages or as HTMX partial updates. All styling uses Tailwind CSS.
//! Text coming from users or the search index goes through [`escape_html`].

pub mod activity;
pub mod chat;
pub mod layout;
pub mod product;

// Re-export main component functions
pub use activity::{empty_state, notification_toast};
pub use chat::{chat_form, chat_message, chat_transcript};
pub use layout::{card, nav_bar, page_header};
pub use product::{pagination, product_card, product_grid};

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
