use crate::builtin::*;
use halo_commerce::Storefront;
use halo_core::{LanguageService, SentimentAnalyzer, Tool};
use halo_memory::MemoryService;
use halo_notify::SupportNotifications;
use halo_rag::Retriever;
use std::sync::Arc;

/// Shared collaborators of the customer-service tools, and the fixed toolset
/// each agent is given.
#[derive(Clone)]
pub struct CustomerServiceTools {
    pub store: Arc<dyn Storefront>,
    pub retriever: Arc<dyn Retriever>,
    pub memory: Arc<dyn MemoryService>,
    pub language: Arc<dyn LanguageService>,
    pub sentiment: Arc<dyn SentimentAnalyzer>,
    pub notifications: SupportNotifications,
}

impl CustomerServiceTools {
    pub fn order_status_tools(&self) -> Vec<Arc<dyn Tool>> {
        vec![
            Arc::new(ExtractOrderIdTool),
            Arc::new(GetOrderStatusTool::new(self.store.clone())),
            Arc::new(AnalyzeSentimentTool::new(self.sentiment.clone())),
        ]
    }

    pub fn product_reco_tools(&self) -> Vec<Arc<dyn Tool>> {
        vec![
            Arc::new(SearchProductsTool::new(self.store.clone())),
            Arc::new(RetrieveMemoryTool::new(self.memory.clone())),
        ]
    }

    pub fn general_qa_tools(&self) -> Vec<Arc<dyn Tool>> {
        vec![
            Arc::new(TranslateToEnglishTool::new(self.language.clone())),
            Arc::new(RetrieveKbSnippetsTool::new(self.retriever.clone())),
        ]
    }

    pub fn handover_tools(&self) -> Vec<Arc<dyn Tool>> {
        vec![
            Arc::new(NotifyEmailSupportTool::new(self.notifications.clone())),
            Arc::new(NotifyTelegramSupportTool::new(self.notifications.clone())),
        ]
    }

    /// Every tool, including `add_memory` which no agent is given by default.
    pub fn all_tools(&self) -> Vec<Arc<dyn Tool>> {
        let mut tools = self.order_status_tools();
        tools.extend(self.product_reco_tools());
        tools.extend(self.general_qa_tools());
        tools.extend(self.handover_tools());
        tools.push(Arc::new(AddMemoryTool::new(self.memory.clone())));
        tools
    }
}
