//! Process-wide collaborators, constructed once from [`Settings`] and passed
//! down explicitly.

use crate::runner::ConversationRunner;
use crate::settings::Settings;
use halo_commerce::CommerceProvider;
use halo_core::{LanguageService, Llm, Result, SentimentAnalyzer};
use halo_memory::{MemoryService, VectorMemoryService};
use halo_model::{LlmLanguageService, VaderSentiment};
use halo_notify::SupportNotifications;
use halo_rag::{IngestPipeline, KnowledgeRetriever, VectorCollection};
use halo_session::ConversationRepository;
use halo_tool::CustomerServiceTools;
use std::sync::Arc;
use tracing::info;

pub struct Services {
    pub settings: Settings,
    pub llm: Arc<dyn Llm>,
    /// Default knowledge-base collection.
    pub collection: VectorCollection,
    pub retriever: Arc<KnowledgeRetriever>,
    pub memory: Arc<dyn MemoryService>,
    pub language: Arc<dyn LanguageService>,
    pub sentiment: Arc<dyn SentimentAnalyzer>,
    pub store: Arc<CommerceProvider>,
    pub notifications: SupportNotifications,
    pub repository: Arc<dyn ConversationRepository>,
}

impl Services {
    /// Fails on a misconfigured model, embedding provider or datastore.
    pub async fn from_settings(settings: Settings) -> Result<Self> {
        let llm = settings.chat_model()?;
        let embedder = settings.embedding_provider()?;
        let vectors = settings.vector_store().await?;
        let repository = settings.conversation_repository().await?;

        let collection = VectorCollection::new(settings.db_schema.clone(), vectors, embedder);
        let language: Arc<dyn LanguageService> = Arc::new(LlmLanguageService::new(llm.clone()));
        let memory = VectorMemoryService::new(collection.with_name(settings.memory_collection()))
            .with_language(language.clone());

        info!(
            collection = collection.name(),
            memory = memory.collection_name(),
            "services ready"
        );

        Ok(Self {
            retriever: Arc::new(KnowledgeRetriever::new(collection.clone())),
            memory: Arc::new(memory),
            sentiment: Arc::new(VaderSentiment::new()),
            store: Arc::new(settings.commerce_provider()),
            notifications: settings.notifier()?,
            llm,
            collection,
            language,
            repository,
            settings,
        })
    }

    pub fn toolkit(&self) -> CustomerServiceTools {
        CustomerServiceTools {
            store: self.store.clone(),
            retriever: self.retriever.clone(),
            memory: self.memory.clone(),
            language: self.language.clone(),
            sentiment: self.sentiment.clone(),
            notifications: self.notifications.clone(),
        }
    }

    pub fn runner(&self) -> Result<ConversationRunner> {
        ConversationRunner::build(
            Some(self.llm.clone()),
            &self.toolkit(),
            self.repository.clone(),
            self.settings.default_locale.clone(),
        )
    }

    /// Saves uploads under the configured directory into the default
    /// collection.
    pub fn ingest_pipeline(&self) -> IngestPipeline {
        IngestPipeline::new(self.collection.clone(), self.settings.uploads_dir.clone())
    }
}
