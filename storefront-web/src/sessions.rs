//! Per-session chat history.
//!
//! Sessions live in memory. Idle sessions expire, the least recently used
//! session is dropped when the store is full, and each history is capped.
//! Turns of one session run one at a time.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use storefront_core::config::ChatConfig;
use storefront_core::{ChatMessage, ChatRole};
use storefront_search::{ScoredProduct, ShoppingAssistant};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// One message of a chat session as shown in the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationEntry {
    pub role: ChatRole,
    pub content: String,
    /// Product an assistant message is grounded in
    pub product: Option<ScoredProduct>,
    pub created_at: DateTime<Utc>,
}

impl ConversationEntry {
    fn user(content: &str) -> Self {
        Self {
            role: ChatRole::User,
            content: content.to_string(),
            product: None,
            created_at: Utc::now(),
        }
    }

    fn assistant(content: String, product: Option<ScoredProduct>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content,
            product,
            created_at: Utc::now(),
        }
    }

    fn as_message(&self) -> ChatMessage {
        ChatMessage {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// Bounds on what the session store keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub max_sessions: usize,
    pub idle_timeout: Duration,
    /// Never below the assistant's history window
    pub stored_messages: usize,
}

impl From<&ChatConfig> for SessionLimits {
    fn from(chat: &ChatConfig) -> Self {
        Self {
            max_sessions: chat.max_sessions.max(1),
            idle_timeout: chat.session_idle_timeout,
            stored_messages: chat.stored_messages.max(chat.history_window),
        }
    }
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self::from(&ChatConfig::default())
    }
}

#[derive(Debug)]
struct Session {
    entries: Vec<ConversationEntry>,
    last_used: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            last_used: Instant::now(),
        }
    }

    fn push(&mut self, entry: ConversationEntry, limit: usize) {
        self.entries.push(entry);
        let excess = self.entries.len().saturating_sub(limit);
        if excess > 0 {
            self.entries.drain(..excess);
        }
        self.last_used = Instant::now();
    }
}

type SessionHandle = Arc<Mutex<Session>>;

/// Chat histories keyed by session id.
#[derive(Debug, Clone, Default)]
pub struct ChatSessions {
    inner: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
    limits: SessionLimits,
}

impl ChatSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: SessionLimits) -> Self {
        Self {
            inner: Arc::default(),
            limits,
        }
    }

    /// Number of sessions currently held.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Messages of a session, oldest first.
    pub async fn history(&self, session: Uuid) -> Vec<ConversationEntry> {
        let handle = self.inner.read().await.get(&session).cloned();
        match handle {
            Some(handle) => {
                let mut state = handle.lock().await;
                state.last_used = Instant::now();
                state.entries.clone()
            }
            None => Vec::new(),
        }
    }

    /// Drops every message of a session.
    pub async fn clear(&self, session: Uuid) {
        self.inner.write().await.remove(&session);
    }

    /// Records a user message, asks the assistant and records its reply.
    ///
    /// Assistant failures become an apology message in the conversation.
    /// The session stays locked for the whole turn, so concurrent turns of
    /// one session are recorded in order.
    pub async fn converse(
        &self,
        assistant: &ShoppingAssistant,
        session: Uuid,
        message: &str,
    ) -> ConversationEntry {
        let handle = self.session(session).await;
        let mut state = handle.lock().await;

        state.push(ConversationEntry::user(message), self.limits.stored_messages);
        let conversation: Vec<ChatMessage> =
            state.entries.iter().map(ConversationEntry::as_message).collect();

        let reply = match assistant.respond(&conversation).await {
            Ok(reply) => ConversationEntry::assistant(reply.content, reply.product),
            Err(e) => {
                tracing::error!("Assistant failed for session {}: {}", session, e);
                ConversationEntry::assistant(format!("Sorry, an error occurred: {e}"), None)
            }
        };

        state.push(reply.clone(), self.limits.stored_messages);
        reply
    }

    async fn session(&self, session: Uuid) -> SessionHandle {
        if let Some(handle) = self.inner.read().await.get(&session) {
            return Arc::clone(handle);
        }

        let mut sessions = self.inner.write().await;
        if let Some(handle) = sessions.get(&session) {
            return Arc::clone(handle);
        }

        self.evict(&mut sessions);
        let handle: SessionHandle = Arc::new(Mutex::new(Session::new()));
        sessions.insert(session, Arc::clone(&handle));
        handle
    }

    /// Drops idle sessions, then least recently used ones until a new
    /// session fits. Sessions in the middle of a turn are kept.
    fn evict(&self, sessions: &mut HashMap<Uuid, SessionHandle>) {
        let mut idle: Vec<(Instant, Uuid)> = sessions
            .iter()
            .filter_map(|(id, handle)| {
                handle
                    .try_lock()
                    .ok()
                    .map(|state| (state.last_used, *id))
            })
            .collect();

        let before = sessions.len();
        idle.retain(|(last_used, id)| {
            if last_used.elapsed() >= self.limits.idle_timeout {
                sessions.remove(id);
                false
            } else {
                true
            }
        });

        idle.sort_unstable_by_key(|(last_used, _)| *last_used);
        let mut oldest = idle.into_iter();
        while sessions.len() >= self.limits.max_sessions {
            match oldest.next() {
                Some((_, id)) => {
                    sessions.remove(&id);
                }
                None => break,
            }
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!("Evicted {} chat sessions, {} remain", evicted, sessions.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use storefront_core::StorefrontConfig;
    use storefront_search::{ProductSearchService, SearchSettings};
    use storefront_sim::{DeterministicModel, InMemoryCatalog};

    use super::*;

    fn assistant(catalog: InMemoryCatalog, model: DeterministicModel) -> ShoppingAssistant {
        let search = ProductSearchService::new(
            Arc::new(catalog),
            Arc::new(model),
            SearchSettings::default(),
        );
        ShoppingAssistant::new(search, StorefrontConfig::default().chat.history_window)
    }

    fn seeded_assistant() -> ShoppingAssistant {
        let model = DeterministicModel::new(64);
        assistant(InMemoryCatalog::seeded(&model), model)
    }

    #[tokio::test]
    async fn test_converse_records_both_turns() {
        let assistant = seeded_assistant();
        let sessions = ChatSessions::new();
        let session = Uuid::new_v4();

        let reply = sessions
            .converse(&assistant, session, "a linen shirt for summer")
            .await;

        assert_eq!(reply.role, ChatRole::Assistant);
        assert!(reply.product.is_some());
        let history = sessions.history(session).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "a linen shirt for summer");
    }

    #[tokio::test]
    async fn test_assistant_error_becomes_apology() {
        let assistant = assistant(InMemoryCatalog::default(), DeterministicModel::new(8));
        let sessions = ChatSessions::new();
        let session = Uuid::new_v4();

        let reply = sessions.converse(&assistant, session, "   ").await;

        assert_eq!(reply.content, "Sorry, an error occurred: Search query is empty");
        assert!(reply.product.is_none());
    }

    #[tokio::test]
    async fn test_clear_forgets_session() {
        let assistant = assistant(InMemoryCatalog::default(), DeterministicModel::new(8));
        let sessions = ChatSessions::new();
        let session = Uuid::new_v4();

        sessions.converse(&assistant, session, "boots").await;
        sessions.clear(session).await;

        assert!(sessions.history(session).await.is_empty());
        assert!(sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_full_store_drops_least_recently_used() {
        let assistant = seeded_assistant();
        let sessions = ChatSessions::with_limits(SessionLimits {
            max_sessions: 3,
            idle_timeout: Duration::from_secs(3600),
            stored_messages: 50,
        });

        let ids: Vec<Uuid> = (0..500).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            sessions.converse(&assistant, *id, "wool coat").await;
        }

        assert_eq!(sessions.len().await, 3);
        assert!(sessions.history(ids[0]).await.is_empty());
        assert_eq!(sessions.history(ids[499]).await.len(), 2);
    }

    #[tokio::test]
    async fn test_idle_sessions_expire() {
        let assistant = seeded_assistant();
        let sessions = ChatSessions::with_limits(SessionLimits {
            max_sessions: 100,
            idle_timeout: Duration::from_millis(20),
            stored_messages: 50,
        });
        let stale = Uuid::new_v4();

        sessions.converse(&assistant, stale, "rain jacket").await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        sessions.converse(&assistant, Uuid::new_v4(), "sneakers").await;

        assert_eq!(sessions.len().await, 1);
        assert!(sessions.history(stale).await.is_empty());
    }

    #[tokio::test]
    async fn test_history_is_capped() {
        let assistant = seeded_assistant();
        let sessions = ChatSessions::with_limits(SessionLimits {
            max_sessions: 10,
            idle_timeout: Duration::from_secs(3600),
            stored_messages: 7,
        });
        let session = Uuid::new_v4();

        for turn in 0..6 {
            sessions
                .converse(&assistant, session, &format!("scarf {turn}"))
                .await;
        }

        let history = sessions.history(session).await;
        assert_eq!(history.len(), 7);
        assert_eq!(history.last().map(|e| e.role), Some(ChatRole::Assistant));
        assert_eq!(history[1].content, "scarf 3");
    }

    #[tokio::test]
    async fn test_concurrent_turns_stay_paired() {
        let assistant = seeded_assistant();
        let sessions = ChatSessions::new();
        let session = Uuid::new_v4();

        tokio::join!(
            sessions.converse(&assistant, session, "linen shirt"),
            sessions.converse(&assistant, session, "leather boots"),
            sessions.converse(&assistant, session, "silk scarf"),
        );

        let history = sessions.history(session).await;
        assert_eq!(history.len(), 6);
        for pair in history.chunks(2) {
            assert_eq!(pair[0].role, ChatRole::User);
            assert_eq!(pair[1].role, ChatRole::Assistant);
        }
    }
}
