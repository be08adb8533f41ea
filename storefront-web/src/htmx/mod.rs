//! HTMX partial update handlers
//!
//! Provides server-rendered HTML fragments swapped into the product and chat
//! pages.

pub mod chat_actions;
pub mod product_listing;

// Re-export main HTMX handlers
pub use chat_actions::{clear_chat, send_chat_message};
pub use product_listing::{ListingParams, product_listing, render_listing};
