use chrono::{DateTime, Utc};
use halo_core::{Redaction, Turn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

pub type UserProfile = HashMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub session_id: String,
    pub channel: String,
    pub locale: Option<String>,
    pub user_profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(
        session_id: impl Into<String>,
        channel: impl Into<String>,
        user_profile: UserProfile,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            channel: channel.into(),
            locale: None,
            user_profile,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }

    /// Unknown roles read back from storage are treated as assistant output.
    pub fn parse(role: &str) -> Self {
        match role {
            "user" => Role::User,
            "system" => Role::System,
            _ => Role::Assistant,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable message row. User content is stored already masked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub role: Role,
    pub content: String,
    pub pii_redactions: Vec<Redaction>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        conversation_id: impl Into<String>,
        role: Role,
        content: impl Into<String>,
        pii_redactions: Vec<Redaction>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: conversation_id.into(),
            role,
            content: content.into(),
            pii_redactions,
            created_at: Utc::now(),
        }
    }

    pub fn to_turn(&self) -> Turn {
        match self.role {
            Role::User => Turn::human(self.content.clone()),
            _ => Turn::ai(self.content.clone()),
        }
    }

    pub fn transcript_line(&self) -> String {
        match self.role {
            Role::User => format!("User: {}", self.content),
            _ => format!("Assistant: {}", self.content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_core::TurnKind;

    #[test]
    fn test_role_round_trip_through_storage_text() {
        for role in [Role::User, Role::Assistant, Role::System] {
            assert_eq!(Role::parse(role.as_str()), role);
        }
        assert_eq!(Role::parse("bot"), Role::Assistant);
    }

    #[test]
    fn test_system_message_is_an_ai_turn() {
        let msg = Message::new("c1", Role::System, "note", vec![]);
        assert_eq!(msg.to_turn().kind, TurnKind::Ai);
        assert_eq!(msg.transcript_line(), "Assistant: note");
    }
}
