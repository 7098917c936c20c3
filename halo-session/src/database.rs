use crate::conversation::{Conversation, Message, Role, UserProfile};
use crate::repository::ConversationRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use halo_core::{HaloError, Redaction, Result};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use std::str::FromStr;

fn session_err(context: &str, e: impl std::fmt::Display) -> HaloError {
    HaloError::Session(format!("{context}: {e}"))
}

fn parse_time(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| session_err("parse date failed", e))
}

/// SQLite-backed repository. `session_id` is UNIQUE, so racing first
/// messages resolve in the database rather than in-process.
pub struct SqliteConversationRepository {
    pool: SqlitePool,
}

impl SqliteConversationRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| session_err("invalid database url", e))?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| session_err("database connection failed", e))?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conversations (
                id TEXT PRIMARY KEY,
                session_id TEXT NOT NULL UNIQUE,
                channel TEXT NOT NULL,
                locale TEXT,
                user_profile TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| session_err("migration failed", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                conversation_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                pii_redactions TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (conversation_id) REFERENCES conversations(id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| session_err("migration failed", e))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_messages_conversation ON messages (conversation_id, seq)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| session_err("migration failed", e))?;

        Ok(())
    }

    fn conversation_from_row(row: &SqliteRow) -> Result<Conversation> {
        let profile: String = row.get("user_profile");
        let created_at: String = row.get("created_at");
        let updated_at: String = row.get("updated_at");
        Ok(Conversation {
            id: row.get("id"),
            session_id: row.get("session_id"),
            channel: row.get("channel"),
            locale: row.get("locale"),
            user_profile: serde_json::from_str(&profile)
                .map_err(|e| session_err("deserialize failed", e))?,
            created_at: parse_time(&created_at)?,
            updated_at: parse_time(&updated_at)?,
        })
    }

    async fn conversation_by_id(&self, conversation_id: &str) -> Result<Conversation> {
        let row = sqlx::query("SELECT * FROM conversations WHERE id = ?")
            .bind(conversation_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| session_err("query failed", e))?
            .ok_or_else(|| HaloError::Session(format!("conversation not found: {conversation_id}")))?;
        Self::conversation_from_row(&row)
    }
}

#[async_trait]
impl ConversationRepository for SqliteConversationRepository {
    async fn get_or_create(
        &self,
        session_id: &str,
        channel: &str,
        user_meta: UserProfile,
    ) -> Result<Conversation> {
        if let Some(existing) = self.find_by_session(session_id).await? {
            return Ok(existing);
        }

        let conversation = Conversation::new(session_id, channel, user_meta);
        let profile = serde_json::to_string(&conversation.user_profile)
            .map_err(|e| session_err("serialize failed", e))?;
        let inserted = sqlx::query(
            "INSERT INTO conversations (id, session_id, channel, locale, user_profile, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) ON CONFLICT(session_id) DO NOTHING",
        )
        .bind(&conversation.id)
        .bind(&conversation.session_id)
        .bind(&conversation.channel)
        .bind(&conversation.locale)
        .bind(&profile)
        .bind(conversation.created_at.to_rfc3339())
        .bind(conversation.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| session_err("insert failed", e))?
        .rows_affected();

        if inserted == 1 {
            tracing::debug!(session_id, channel, "created conversation");
            return Ok(conversation);
        }

        // Lost the race: return the winner's row.
        self.find_by_session(session_id)
            .await?
            .ok_or_else(|| HaloError::Session(format!("conversation vanished: {session_id}")))
    }

    async fn find_by_session(&self, session_id: &str) -> Result<Option<Conversation>> {
        sqlx::query("SELECT * FROM conversations WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| session_err("query failed", e))?
            .map(|row| Self::conversation_from_row(&row))
            .transpose()
    }

    async fn append_message(
        &self,
        conversation_id: &str,
        role: Role,
        content: &str,
        pii_redactions: Vec<Redaction>,
    ) -> Result<Message> {
        let message = Message::new(conversation_id, role, content, pii_redactions);
        let redactions = serde_json::to_string(&message.pii_redactions)
            .map_err(|e| session_err("serialize failed", e))?;
        let now = message.created_at.to_rfc3339();

        let mut tx = self.pool.begin().await.map_err(|e| session_err("transaction failed", e))?;
        sqlx::query(
            "INSERT INTO messages (id, conversation_id, role, content, pii_redactions, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&message.id)
        .bind(conversation_id)
        .bind(role.as_str())
        .bind(&message.content)
        .bind(&redactions)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| session_err("insert failed", e))?;

        sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
            .bind(&now)
            .bind(conversation_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| session_err("update failed", e))?;
        tx.commit().await.map_err(|e| session_err("commit failed", e))?;

        Ok(message)
    }

    async fn messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let rows = sqlx::query(
            "SELECT id, conversation_id, role, content, pii_redactions, created_at \
             FROM messages WHERE conversation_id = ? ORDER BY seq ASC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| session_err("query failed", e))?;

        rows.iter()
            .map(|row| {
                let role: String = row.get("role");
                let redactions: String = row.get("pii_redactions");
                let created_at: String = row.get("created_at");
                Ok(Message {
                    id: row.get("id"),
                    conversation_id: row.get("conversation_id"),
                    role: Role::parse(&role),
                    content: row.get("content"),
                    pii_redactions: serde_json::from_str(&redactions)
                        .map_err(|e| session_err("deserialize failed", e))?,
                    created_at: parse_time(&created_at)?,
                })
            })
            .collect()
    }

    async fn update_profile(
        &self,
        conversation_id: &str,
        profile: UserProfile,
        locale: Option<String>,
    ) -> Result<Conversation> {
        let mut conversation = self.conversation_by_id(conversation_id).await?;
        conversation.user_profile.extend(profile);
        if locale.is_some() {
            conversation.locale = locale;
        }
        conversation.updated_at = Utc::now();
        let profile_json = serde_json::to_string(&conversation.user_profile)
            .map_err(|e| session_err("serialize failed", e))?;

        sqlx::query("UPDATE conversations SET user_profile = ?, locale = ?, updated_at = ? WHERE id = ?")
            .bind(&profile_json)
            .bind(&conversation.locale)
            .bind(conversation.updated_at.to_rfc3339())
            .bind(conversation_id)
            .execute(&self.pool)
            .await
            .map_err(|e| session_err("update failed", e))?;
        Ok(conversation)
    }
}
