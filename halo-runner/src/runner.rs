use crate::router::IntentRouter;
use crate::workflow::build_workflow;
use halo_agent::AgentPool;
use halo_core::{LanguageService, Llm, Result, Turn};
use halo_graph::{CompiledGraph, ExecutionConfig, GraphState};
use halo_guardrail::mask_pii;
use halo_memory::{DEFAULT_MEMORY_K, MemoryService};
use halo_notify::SupportNotifications;
use halo_session::{ConversationRepository, Role, UserProfile};
use halo_telemetry::{Instrument, conversation_turn_span, record_turn_outcome};
use halo_tool::CustomerServiceTools;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Turns handed to the graph, memories included.
pub const HISTORY_LIMIT: usize = 20;

pub struct RunnerConfig {
    pub graph: Arc<CompiledGraph>,
    pub repository: Arc<dyn ConversationRepository>,
    pub memory: Arc<dyn MemoryService>,
    pub language: Arc<dyn LanguageService>,
    pub notifications: SupportNotifications,
    /// Locale of conversations that have none stored.
    pub default_locale: String,
}

/// Runs one turn of a conversation end to end: persistence, PII masking,
/// memory, the state machine, translation and handoff notifications.
pub struct ConversationRunner {
    graph: Arc<CompiledGraph>,
    repository: Arc<dyn ConversationRepository>,
    memory: Arc<dyn MemoryService>,
    language: Arc<dyn LanguageService>,
    notifications: SupportNotifications,
    default_locale: String,
}

impl ConversationRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            graph: config.graph,
            repository: config.repository,
            memory: config.memory,
            language: config.language,
            notifications: config.notifications,
            default_locale: config.default_locale,
        }
    }

    /// Router, agent pool and workflow over `llm` and the shared tool
    /// collaborators. Without a model every handler answers with its
    /// fallback and every intent is a complaint.
    pub fn build(
        llm: Option<Arc<dyn Llm>>,
        toolkit: &CustomerServiceTools,
        repository: Arc<dyn ConversationRepository>,
        default_locale: impl Into<String>,
    ) -> Result<Self> {
        let router = Arc::new(IntentRouter::new(llm.clone(), toolkit.sentiment.clone()));
        let pool = Arc::new(AgentPool::from_model(llm, toolkit));
        let graph = build_workflow(router, pool)?;

        Ok(Self::new(RunnerConfig {
            graph: Arc::new(graph),
            repository,
            memory: toolkit.memory.clone(),
            language: toolkit.language.clone(),
            notifications: toolkit.notifications.clone(),
            default_locale: default_locale.into(),
        }))
    }

    pub fn graph(&self) -> &CompiledGraph {
        &self.graph
    }

    pub fn repository(&self) -> &Arc<dyn ConversationRepository> {
        &self.repository
    }

    /// Handle one inbound message. Memory and notification failures are
    /// logged and skipped; persistence and graph failures are returned.
    pub async fn run_conversation(
        &self,
        session_id: &str,
        message: &str,
        channel: &str,
        user_meta: UserProfile,
    ) -> Result<GraphState> {
        let span = conversation_turn_span(session_id, channel);
        let outcome_span = span.clone();

        async move {
            let state = self.run_turn(session_id, message, channel, user_meta).await?;
            record_turn_outcome(&outcome_span, state.current_task.as_deref(), state.handoff_to_human);
            Ok(state)
        }
        .instrument(span)
        .await
    }

    async fn run_turn(
        &self,
        session_id: &str,
        message: &str,
        channel: &str,
        user_meta: UserProfile,
    ) -> Result<GraphState> {
        let conversation = self.repository.get_or_create(session_id, channel, user_meta).await?;
        let locale = conversation.locale.clone().unwrap_or_else(|| self.default_locale.clone());

        let (masked, redactions) = mask_pii(message);
        self.repository.append_message(&conversation.id, Role::User, &masked, redactions.clone()).await?;
        debug!(conversation_id = %conversation.id, redactions = redactions.len(), "stored user message");

        self.remember(session_id, Role::User, &masked).await;

        let user_lang = self.language.detect(&masked).unwrap_or(locale);

        let persisted = self.repository.history_as_turns(&conversation.id).await?;
        let memories = self.recall(session_id, &masked).await;

        let input = GraphState {
            session_id: session_id.to_string(),
            channel: channel.to_string(),
            conversation_history: assemble_history(memories, persisted),
            user_query: masked,
            current_task: None,
            user_profile: conversation.user_profile.clone(),
            sentiment_score: 0.0,
            handoff_to_human: false,
            locale: Some(user_lang.clone()),
            pii_redactions: redactions,
            detected_language: Some(user_lang.clone()),
            assistant_response: None,
        };

        let mut state = self.graph.invoke(input, ExecutionConfig::new(session_id)).await?;

        let raw_answer = state.assistant_response.take().unwrap_or_default();
        let answer = self.language.translate_to_language(&raw_answer, &user_lang).await;

        self.repository.append_message(&conversation.id, Role::Assistant, &answer, Vec::new()).await?;
        self.remember(session_id, Role::Assistant, &answer).await;

        if state.handoff_to_human {
            self.notify_handover(session_id, &conversation.id).await;
        }

        info!(
            current_task = state.current_task.as_deref().unwrap_or("none"),
            handoff = state.handoff_to_human,
            language = %user_lang,
            "turn complete"
        );
        state.assistant_response = Some(answer);
        Ok(state)
    }

    async fn remember(&self, session_id: &str, role: Role, content: &str) {
        if let Err(e) = self.memory.add(session_id, role.as_str(), content).await {
            warn!(session_id, role = %role, error = %e, "memory write failed");
        }
    }

    async fn recall(&self, session_id: &str, query: &str) -> Vec<Turn> {
        match self.memory.retrieve(session_id, query, DEFAULT_MEMORY_K).await {
            Ok(entries) => entries.iter().map(|entry| entry.to_turn()).collect(),
            Err(e) => {
                warn!(session_id, error = %e, "memory retrieval failed");
                Vec::new()
            }
        }
    }

    async fn notify_handover(&self, session_id: &str, conversation_id: &str) {
        match self.repository.transcript(conversation_id).await {
            Ok(transcript) => {
                self.notifications.notify_handover(session_id, &transcript).await;
            }
            Err(e) => warn!(session_id, error = %e, "transcript unavailable, handover not notified"),
        }
    }
}

/// Up to [`DEFAULT_MEMORY_K`] memories first, then the most recent persisted
/// turns, at most [`HISTORY_LIMIT`] in total.
pub fn assemble_history(mut memories: Vec<Turn>, persisted: Vec<Turn>) -> Vec<Turn> {
    memories.truncate(DEFAULT_MEMORY_K);
    let room = HISTORY_LIMIT - memories.len();
    let skip = persisted.len().saturating_sub(room);
    memories.extend(persisted.into_iter().skip(skip));
    memories
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn turns(prefix: &str, n: usize) -> Vec<Turn> {
        (0..n).map(|i| Turn::human(format!("{prefix}{i}"))).collect()
    }

    #[test]
    fn test_memories_come_first() {
        let history = assemble_history(turns("m", 2), turns("h", 3));
        let contents: Vec<&str> = history.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, ["m0", "m1", "h0", "h1", "h2"]);
    }

    #[test]
    fn test_keeps_most_recent_persisted_turns() {
        let history = assemble_history(turns("m", 4), turns("h", 30));
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[3].content, "m3");
        assert_eq!(history[4].content, "h14");
        assert_eq!(history[19].content, "h29");
    }

    proptest! {
        #[test]
        fn history_never_exceeds_limit(m in 0usize..10, h in 0usize..60) {
            let history = assemble_history(turns("m", m), turns("h", h));
            prop_assert!(history.len() <= HISTORY_LIMIT);
            prop_assert_eq!(history.len(), (m.min(DEFAULT_MEMORY_K) + h).min(HISTORY_LIMIT));
            if h > 0 {
                prop_assert_eq!(history.last().map(|t| t.content.clone()), Some(format!("h{}", h - 1)));
            }
        }
    }
}
