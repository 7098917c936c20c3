//! Process configuration read from the environment.

use halo_commerce::{CommerceConfig, CommerceProvider};
use halo_core::{HaloError, Llm, Result};
use halo_model::{OpenAICompatibleClient, OpenAICompatibleConfig};
use halo_notify::{SmtpConfig, SmtpNotifier, SupportNotifications, TelegramConfig, TelegramNotifier};
use halo_rag::{EmbeddingProvider, InMemoryVectorStore, OpenAIEmbeddingProvider, VectorStore};
use halo_session::{ConversationRepository, InMemoryConversationRepository};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_EMBED_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1:8b-instruct";
pub const DEFAULT_OLLAMA_EMBED_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_DB_SCHEMA: &str = "ai_cs";
pub const DEFAULT_UPLOADS_DIR: &str = "uploads";
pub const DEFAULT_LOCALE: &str = "id";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct Settings {
    /// OpenAI is used for chat and embeddings when set, Ollama otherwise.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub openai_embed_model: String,
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub ollama_embed_model: String,
    pub database_url: Option<String>,
    /// Default collection name. Memories live in `{db_schema}_memory`.
    pub db_schema: String,
    pub uploads_dir: PathBuf,
    pub default_locale: String,
    pub http_timeout_secs: u64,
    pub smtp: Option<SmtpConfig>,
    pub telegram: Option<TelegramConfig>,
    pub commerce: CommerceConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Settings {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => info!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => warn!(error = %e, "ignoring unreadable .env"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let http_timeout_secs = get("HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        let telegram = TelegramConfig::from_lookup(&lookup).map(|mut config| {
            config.timeout_secs = http_timeout_secs;
            config
        });

        Self {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            openai_base_url: or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            openai_embed_model: or("OPENAI_EMBED_MODEL", DEFAULT_OPENAI_EMBED_MODEL),
            ollama_base_url: or("OLLAMA_BASE_URL", DEFAULT_OLLAMA_BASE_URL),
            ollama_model: or("OLLAMA_MODEL", DEFAULT_OLLAMA_MODEL),
            ollama_embed_model: or("OLLAMA_EMBED_MODEL", DEFAULT_OLLAMA_EMBED_MODEL),
            database_url: get("DATABASE_URL"),
            db_schema: or("DB_SCHEMA", DEFAULT_DB_SCHEMA),
            uploads_dir: PathBuf::from(or("UPLOADS_DIR", DEFAULT_UPLOADS_DIR)),
            default_locale: or("DEFAULT_LOCALE", DEFAULT_LOCALE),
            http_timeout_secs,
            smtp: SmtpConfig::from_lookup(&lookup),
            telegram,
            commerce: CommerceConfig::from_lookup(&lookup).with_timeout_secs(http_timeout_secs),
        }
    }

    /// Chat model: OpenAI when a key is configured, else Ollama's
    /// OpenAI-compatible endpoint.
    pub fn chat_model(&self) -> Result<Arc<dyn Llm>> {
        let config = match &self.openai_api_key {
            Some(key) => OpenAICompatibleConfig::openai(key.clone(), self.openai_model.clone())
                .with_base_url(self.openai_base_url.clone()),
            None => OpenAICompatibleConfig::ollama(&self.ollama_base_url, self.ollama_model.clone()),
        }
        .with_timeout_secs(self.http_timeout_secs);

        info!(provider = %config.provider_name, model = %config.model, "chat model configured");
        Ok(Arc::new(OpenAICompatibleClient::new(config)?))
    }

    pub fn embedding_provider(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        let timeout = Duration::from_secs(self.http_timeout_secs);
        let provider = match &self.openai_api_key {
            Some(key) => OpenAIEmbeddingProvider::new(
                Some(key.clone()),
                self.openai_base_url.clone(),
                self.openai_embed_model.clone(),
                timeout,
            ),
            None => OpenAIEmbeddingProvider::new(
                None,
                format!("{}/v1", self.ollama_base_url.trim_end_matches('/')),
                self.ollama_embed_model.clone(),
                timeout,
            ),
        }
        .map_err(|e| HaloError::Config(format!("embedding provider: {e}")))?;

        info!(model = provider.model_name(), "embedding provider configured");
        Ok(Arc::new(provider))
    }

    /// Support channels. Unconfigured channels are no-ops and an SMTP relay
    /// that cannot be set up is disabled with a warning.
    pub fn notifier(&self) -> Result<SupportNotifications> {
        let email = SmtpNotifier::new(self.smtp.clone()).unwrap_or_else(|e| {
            warn!(error = %e, "email notifications disabled");
            SmtpNotifier::disabled()
        });
        let telegram = TelegramNotifier::new(self.telegram.clone())?;

        Ok(SupportNotifications::new(Arc::new(email), Arc::new(telegram)))
    }

    pub fn commerce_provider(&self) -> CommerceProvider {
        CommerceProvider::from_config(&self.commerce)
    }

    /// pgvector when `DATABASE_URL` is a Postgres URL and the `pgvector`
    /// feature is on, in-memory otherwise.
    pub async fn vector_store(&self) -> Result<Arc<dyn VectorStore>> {
        match self.database_url.as_deref() {
            #[cfg(feature = "pgvector")]
            Some(url) if url.starts_with("postgres") => {
                let store = halo_rag::PgVectorStore::connect(url).await?;
                Ok(Arc::new(store))
            }
            Some(url) if url.starts_with("postgres") => {
                warn!("DATABASE_URL is Postgres but the pgvector feature is off; using in-memory vectors");
                Ok(Arc::new(InMemoryVectorStore::new()))
            }
            _ => Ok(Arc::new(InMemoryVectorStore::new())),
        }
    }

    /// SQLite when `DATABASE_URL` starts with `sqlite:` and the `sqlite`
    /// feature is on, in-memory otherwise.
    pub async fn conversation_repository(&self) -> Result<Arc<dyn ConversationRepository>> {
        match self.database_url.as_deref() {
            #[cfg(feature = "sqlite")]
            Some(url) if url.starts_with("sqlite:") => {
                let repo = halo_session::SqliteConversationRepository::new(url).await?;
                repo.migrate().await?;
                Ok(Arc::new(repo))
            }
            Some(url) if url.starts_with("sqlite:") => {
                warn!("DATABASE_URL is SQLite but the sqlite feature is off; conversations kept in memory");
                Ok(Arc::new(InMemoryConversationRepository::new()))
            }
            _ => Ok(Arc::new(InMemoryConversationRepository::new())),
        }
    }

    pub fn memory_collection(&self) -> String {
        halo_memory::memory_collection_name(&self.db_schema)
    }
}
