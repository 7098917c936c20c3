//! Nodes of the conversation state machine.

use crate::router::{Intent, IntentRouter};
use async_trait::async_trait;
use halo_agent::{AgentKind, AgentPool};
use halo_graph::{Node, NodeContext, Result, StateUpdate};
use std::sync::Arc;
use tracing::debug;

pub const START_NODE: &str = "start";
pub const ROUTER_NODE: &str = "router";
pub const END_NODE: &str = "end";

pub const GREETING: &str = "Halo! Ada yang bisa saya bantu hari ini? Anda bisa menanyakan tentang status pesanan, rekomendasi produk, atau informasi umum lainnya.";
pub const CLOSING: &str = "Apakah ada pertanyaan lain? Jika tidak, terima kasih telah menghubungi kami.";

/// Handler nodes are named after their agent.
pub fn handler_node_name(kind: AgentKind) -> &'static str {
    kind.as_str()
}

/// Agent that answers an intent. Complaints go to the handover agent.
pub fn agent_for(intent: Intent) -> AgentKind {
    match intent {
        Intent::OrderStatus => AgentKind::OrderStatus,
        Intent::ProductRecommendation => AgentKind::ProductReco,
        Intent::GeneralInquiry => AgentKind::GeneralQa,
        Intent::Complaint => AgentKind::Handover,
    }
}

pub struct StartNode;

#[async_trait]
impl Node for StartNode {
    fn name(&self) -> &str {
        START_NODE
    }

    async fn execute(&self, _ctx: &NodeContext) -> Result<StateUpdate> {
        Ok(StateUpdate::new().assistant_response(GREETING))
    }
}

pub struct RouterNode {
    router: Arc<IntentRouter>,
}

impl RouterNode {
    pub fn new(router: Arc<IntentRouter>) -> Self {
        Self { router }
    }
}

#[async_trait]
impl Node for RouterNode {
    fn name(&self) -> &str {
        ROUTER_NODE
    }

    async fn execute(&self, ctx: &NodeContext) -> Result<StateUpdate> {
        let decision = self.router.route(&ctx.state.user_query).await;
        debug!(intent = %decision.intent, sentiment = decision.sentiment, handoff = decision.handoff, "routed");

        let mut update =
            StateUpdate::new().current_task(decision.intent.label()).sentiment_score(decision.sentiment);
        if decision.handoff {
            update = update.handoff_to_human(true);
        }
        Ok(update)
    }
}

/// Runs one agent of the pool on the user query.
pub struct HandlerNode {
    kind: AgentKind,
    pool: Arc<AgentPool>,
}

impl HandlerNode {
    pub fn new(kind: AgentKind, pool: Arc<AgentPool>) -> Self {
        Self { kind, pool }
    }
}

#[async_trait]
impl Node for HandlerNode {
    fn name(&self) -> &str {
        handler_node_name(self.kind)
    }

    async fn execute(&self, ctx: &NodeContext) -> Result<StateUpdate> {
        let state = &ctx.state;
        let reply = self.pool.respond(self.kind, &state.session_id, &state.channel, &state.user_query).await;
        debug!(agent = %self.kind, source = ?reply.source, "handler replied");

        let update = StateUpdate::new().assistant_response(reply.text);
        Ok(match self.kind {
            AgentKind::Handover => update.handoff_to_human(true),
            _ => update,
        })
    }
}

/// Keeps the handler's answer, or closes the conversation when there is
/// none.
pub struct EndNode;

#[async_trait]
impl Node for EndNode {
    fn name(&self) -> &str {
        END_NODE
    }

    async fn execute(&self, ctx: &NodeContext) -> Result<StateUpdate> {
        if ctx.state.response().is_some() {
            return Ok(StateUpdate::new());
        }
        Ok(StateUpdate::new().assistant_response(CLOSING))
    }
}
