//! Storefront Web - HTMX storefront and JSON API server

#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]
//!
//! Server-rendered product browsing and shopping chat pages with HTMX partial
//! updates, plus JSON endpoints for external clients.

pub mod components;
pub mod handlers;
pub mod htmx;
pub mod pages;
pub mod server;
pub mod services;
pub mod sessions;

// Re-export main types
pub use server::{AppState, build_router, run_server};
pub use services::ServiceStack;
pub use sessions::{ChatSessions, ConversationEntry, SessionLimits};
