use crate::fallback::{error_fallback, parse_error_fallback, unavailable_fallback};
use crate::react::{Agent, ReactAgent};
use halo_core::{Llm, SessionToolContext, Tool, ToolContext};
use halo_guardrail::{is_react_trace, sanitize_agent_input};
use halo_tool::CustomerServiceTools;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{error, warn};

const FORMAT_REMINDER: &str = " IMPORTANT: Follow the exact format specified above.";

/// The specialized agents a conversation can be dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    OrderStatus,
    ProductReco,
    GeneralQa,
    Handover,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] =
        [AgentKind::OrderStatus, AgentKind::ProductReco, AgentKind::GeneralQa, AgentKind::Handover];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::OrderStatus => "order_status",
            AgentKind::ProductReco => "product_reco",
            AgentKind::GeneralQa => "general_qa",
            AgentKind::Handover => "handover",
        }
    }

    pub fn instruction(&self) -> String {
        let role = match self {
            AgentKind::OrderStatus => {
                "You are an expert customer service assistant focused on order status. \
                 Extract order id if missing, else call the order status tool. \
                 Keep answers brief and polite."
            }
            AgentKind::ProductReco => {
                "You are a helpful product recommendation assistant. \
                 Understand preferences and return 1-3 options with titles and links."
            }
            AgentKind::GeneralQa => {
                return "You are a knowledgeable assistant. \
                        Translate the query to English for retrieval and synthesize a concise answer from snippets. \
                        If not found, say you're not sure and suggest contacting support. \
                        IMPORTANT: Follow the exact format specified above. \
                        CRITICAL: Always use proper line breaks between Thought, Action, Action Input, and Observation. \
                        CRITICAL: Never use commas in Action Input - use separate lines or spaces."
                    .to_string();
            }
            AgentKind::Handover => {
                "You are a handover coordinator. \
                 Apologize and inform that a human agent will take over, then notify support channels."
            }
        };
        format!("{role}{FORMAT_REMINDER}")
    }

    pub fn temperature(&self) -> f32 {
        match self {
            AgentKind::OrderStatus | AgentKind::Handover => 0.0,
            AgentKind::ProductReco | AgentKind::GeneralQa => 0.2,
        }
    }

    pub fn tools(&self, toolkit: &CustomerServiceTools) -> Vec<Arc<dyn Tool>> {
        match self {
            AgentKind::OrderStatus => toolkit.order_status_tools(),
            AgentKind::ProductReco => toolkit.product_reco_tools(),
            AgentKind::GeneralQa => toolkit.general_qa_tools(),
            AgentKind::Handover => toolkit.handover_tools(),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a reply was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Agent,
    Unavailable,
    ParseFallback,
    ErrorFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReply {
    pub text: String,
    pub source: ReplySource,
}

/// One optional agent per [`AgentKind`]. A missing agent is answered with a
/// fixed apology rather than an error.
#[derive(Default, Clone)]
pub struct AgentPool {
    agents: HashMap<AgentKind, Arc<dyn Agent>>,
}

impl AgentPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build all four agents over `model`. Without a model the pool is empty.
    pub fn from_model(model: Option<Arc<dyn Llm>>, toolkit: &CustomerServiceTools) -> Self {
        let mut pool = Self::new();
        let Some(model) = model else {
            warn!("no chat model configured; agents will answer with canned replies");
            return pool;
        };
        for kind in AgentKind::ALL {
            let built = ReactAgent::builder(kind.as_str())
                .instruction(kind.instruction())
                .temperature(kind.temperature())
                .tools(kind.tools(toolkit))
                .model(model.clone())
                .build();
            match built {
                Ok(agent) => pool.agents.insert(kind, Arc::new(agent)),
                Err(e) => {
                    error!(agent = %kind, error = %e, "failed to create agent");
                    None
                }
            };
        }
        pool
    }

    pub fn with_agent(mut self, kind: AgentKind, agent: Arc<dyn Agent>) -> Self {
        self.agents.insert(kind, agent);
        self
    }

    pub fn agent(&self, kind: AgentKind) -> Option<Arc<dyn Agent>> {
        self.agents.get(&kind).cloned()
    }

    /// Answer `query` with the agent of `kind`. Never fails: every failure
    /// is replaced by a canned reply.
    pub async fn respond(
        &self,
        kind: AgentKind,
        session_id: &str,
        channel: &str,
        query: &str,
    ) -> AgentReply {
        let Some(agent) = self.agent(kind) else {
            error!(agent = %kind, "agent unavailable");
            return AgentReply { text: unavailable_fallback(kind).to_string(), source: ReplySource::Unavailable };
        };

        let ctx: Arc<dyn ToolContext> =
            Arc::new(SessionToolContext::new(session_id, channel).with_agent(kind.as_str()));
        let input = sanitize_agent_input(query);

        match agent.run(ctx, &input).await {
            Ok(text) if is_react_trace(&text) => {
                warn!(agent = %kind, "answer is a raw reasoning trace");
                AgentReply {
                    text: parse_error_fallback(kind, query).to_string(),
                    source: ReplySource::ParseFallback,
                }
            }
            Ok(text) => AgentReply { text, source: ReplySource::Agent },
            Err(e) if e.is_output_parse() => {
                error!(agent = %kind, error = %e, "parsing error");
                AgentReply {
                    text: parse_error_fallback(kind, query).to_string(),
                    source: ReplySource::ParseFallback,
                }
            }
            Err(e) => {
                error!(agent = %kind, error = %e, "agent error");
                AgentReply { text: error_fallback(kind).to_string(), source: ReplySource::ErrorFallback }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperatures() {
        assert_eq!(AgentKind::OrderStatus.temperature(), 0.0);
        assert_eq!(AgentKind::ProductReco.temperature(), 0.2);
        assert_eq!(AgentKind::GeneralQa.temperature(), 0.2);
        assert_eq!(AgentKind::Handover.temperature(), 0.0);
    }

    #[test]
    fn test_instructions_carry_format_reminder() {
        for kind in AgentKind::ALL {
            assert!(kind.instruction().contains("IMPORTANT: Follow the exact format specified above."));
        }
        assert!(AgentKind::GeneralQa.instruction().contains("Never use commas in Action Input"));
        assert!(AgentKind::OrderStatus.instruction().starts_with("You are an expert customer service assistant"));
    }

    #[tokio::test]
    async fn test_empty_pool_answers_with_apology() {
        let pool = AgentPool::new();
        let reply = pool.respond(AgentKind::Handover, "web:1", "web", "tolong").await;
        assert_eq!(reply.source, ReplySource::Unavailable);
        assert!(reply.text.contains("agen manusia"));
    }
}
