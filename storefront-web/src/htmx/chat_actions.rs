//! Chat HTMX handlers

use axum::extract::{Form, State};
use axum::response::Html;
use serde::Deserialize;
use uuid::Uuid;

use crate::components::{activity, chat};
use crate::server::AppState;

/// Form data for sending a chat message
#[derive(Debug, Deserialize)]
pub struct ChatMessageForm {
    pub session_id: Uuid,
    pub message: String,
}

/// Form data identifying a chat session
#[derive(Debug, Deserialize)]
pub struct ChatSessionForm {
    pub session_id: Uuid,
}

/// Answers a chat message and re-renders the transcript.
pub async fn send_chat_message(
    State(state): State<AppState>,
    Form(form): Form<ChatMessageForm>,
) -> Html<String> {
    let message = form.message.trim();
    if message.is_empty() {
        let history = state.sessions.history(form.session_id).await;
        return Html(format!(
            "{}{}",
            activity::notification_toast("Please enter a message.", "warning", true),
            chat::chat_transcript(&history)
        ));
    }

    state
        .sessions
        .converse(&state.assistant, form.session_id, message)
        .await;

    let history = state.sessions.history(form.session_id).await;
    Html(chat::chat_transcript(&history))
}

/// Clears the chat session and renders the empty transcript.
pub async fn clear_chat(
    State(state): State<AppState>,
    Form(form): Form<ChatSessionForm>,
) -> Html<String> {
    state.sessions.clear(form.session_id).await;
    tracing::debug!("Cleared chat session {}", form.session_id);
    Html(chat::chat_transcript(&[]))
}
