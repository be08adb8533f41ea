//! Chat page - product recommendations in conversation

use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;
use uuid::Uuid;

use crate::components::{chat, layout};
use crate::pages::render_page;
use crate::server::AppState;

/// Optional session to resume
#[derive(Debug, Default, Deserialize)]
pub struct ChatPageQuery {
    pub session: Option<Uuid>,
}

/// Renders the chat page, starting a new session unless one is given.
pub async fn chat_page(
    State(state): State<AppState>,
    Query(query): Query<ChatPageQuery>,
) -> Html<String> {
    let session = query.session.unwrap_or_else(Uuid::new_v4);
    let history = state.sessions.history(session).await;

    let clear_button = layout::button(
        "Clear chat",
        "ghost",
        Some(&format!(
            r##"hx-post="/htmx/chat/clear" hx-vals='{{"session_id": "{session}"}}' hx-target="#chat-messages" hx-swap="innerHTML""##
        )),
    );

    let content = format!(
        r#"{}
        <div id="chat-messages" class="bg-gray-800 border border-gray-700 rounded-lg p-6 min-h-[24rem]">
            {}
        </div>
        {}"#,
        layout::page_header(
            "Shopping Assistant",
            Some("Describe what you are looking for and get a recommendation"),
            Some(&clear_button)
        ),
        chat::chat_transcript(&history),
        chat::chat_form(session)
    );

    render_page("Chat", "chat", &content)
}
