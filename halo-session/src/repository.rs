use crate::conversation::{Conversation, Message, Role, UserProfile};
use async_trait::async_trait;
use halo_core::{Redaction, Result, Turn};

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Fetch the conversation for `session_id`, creating it with `channel` and
    /// `user_meta` as the initial profile. Concurrent first calls for one
    /// session all return the same row.
    async fn get_or_create(
        &self,
        session_id: &str,
        channel: &str,
        user_meta: UserProfile,
    ) -> Result<Conversation>;

    async fn find_by_session(&self, session_id: &str) -> Result<Option<Conversation>>;

    async fn append_message(
        &self,
        conversation_id: &str,
        role: Role,
        content: &str,
        pii_redactions: Vec<Redaction>,
    ) -> Result<Message>;

    /// Messages oldest first.
    async fn messages(&self, conversation_id: &str) -> Result<Vec<Message>>;

    /// Merge `profile` into the stored profile and optionally set the locale.
    async fn update_profile(
        &self,
        conversation_id: &str,
        profile: UserProfile,
        locale: Option<String>,
    ) -> Result<Conversation>;

    async fn history_as_turns(&self, conversation_id: &str) -> Result<Vec<Turn>> {
        Ok(self.messages(conversation_id).await?.iter().map(Message::to_turn).collect())
    }

    async fn transcript(&self, conversation_id: &str) -> Result<String> {
        Ok(format_transcript(&self.messages(conversation_id).await?))
    }
}

/// One `User: ...` / `Assistant: ...` line per message.
pub fn format_transcript(messages: &[Message]) -> String {
    messages.iter().map(Message::transcript_line).collect::<Vec<_>>().join("\n")
}
