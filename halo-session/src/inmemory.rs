use crate::conversation::{Conversation, Message, Role, UserProfile};
use crate::repository::ConversationRepository;
use async_trait::async_trait;
use chrono::Utc;
use halo_core::{HaloError, Redaction, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Store {
    // session_id -> conversation
    conversations: HashMap<String, Conversation>,
    // conversation_id -> session_id
    sessions: HashMap<String, String>,
    messages: HashMap<String, Vec<Message>>,
}

#[derive(Default)]
pub struct InMemoryConversationRepository {
    store: RwLock<Store>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn conversation_count(&self) -> usize {
        self.store.read().await.conversations.len()
    }
}

fn not_found(conversation_id: &str) -> HaloError {
    HaloError::Session(format!("conversation not found: {conversation_id}"))
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn get_or_create(
        &self,
        session_id: &str,
        channel: &str,
        user_meta: UserProfile,
    ) -> Result<Conversation> {
        if let Some(existing) = self.store.read().await.conversations.get(session_id) {
            return Ok(existing.clone());
        }

        let mut store = self.store.write().await;
        // Another task may have created it between the two locks.
        if let Some(existing) = store.conversations.get(session_id) {
            return Ok(existing.clone());
        }
        let conversation = Conversation::new(session_id, channel, user_meta);
        store.sessions.insert(conversation.id.clone(), session_id.to_string());
        store.messages.insert(conversation.id.clone(), Vec::new());
        store.conversations.insert(session_id.to_string(), conversation.clone());
        tracing::debug!(session_id, channel, "created conversation");
        Ok(conversation)
    }

    async fn find_by_session(&self, session_id: &str) -> Result<Option<Conversation>> {
        Ok(self.store.read().await.conversations.get(session_id).cloned())
    }

    async fn append_message(
        &self,
        conversation_id: &str,
        role: Role,
        content: &str,
        pii_redactions: Vec<Redaction>,
    ) -> Result<Message> {
        let mut store = self.store.write().await;
        let session_id =
            store.sessions.get(conversation_id).cloned().ok_or_else(|| not_found(conversation_id))?;
        let message = Message::new(conversation_id, role, content, pii_redactions);
        store.messages.entry(conversation_id.to_string()).or_default().push(message.clone());
        if let Some(conversation) = store.conversations.get_mut(&session_id) {
            conversation.updated_at = Utc::now();
        }
        Ok(message)
    }

    async fn messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let store = self.store.read().await;
        store.messages.get(conversation_id).cloned().ok_or_else(|| not_found(conversation_id))
    }

    async fn update_profile(
        &self,
        conversation_id: &str,
        profile: UserProfile,
        locale: Option<String>,
    ) -> Result<Conversation> {
        let mut store = self.store.write().await;
        let session_id =
            store.sessions.get(conversation_id).cloned().ok_or_else(|| not_found(conversation_id))?;
        let conversation =
            store.conversations.get_mut(&session_id).ok_or_else(|| not_found(conversation_id))?;
        conversation.user_profile.extend(profile);
        if locale.is_some() {
            conversation.locale = locale;
        }
        conversation.updated_at = Utc::now();
        Ok(conversation.clone())
    }
}
