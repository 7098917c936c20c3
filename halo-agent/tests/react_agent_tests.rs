use halo_agent::{Agent, AgentError, OBSERVATION_STOP, ReactAgent};
use halo_core::{HaloError, Llm, SessionToolContext, Tool, ToolContext};
use halo_model::MockLlm;
use halo_tool::{ExtractOrderIdTool, FunctionTool, GetOrderStatusTool};
use serde_json::{Value, json};
use std::sync::Arc;

fn ctx() -> Arc<dyn ToolContext> {
    Arc::new(SessionToolContext::new("web:1", "web").with_agent("order_status"))
}

fn order_tools() -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ExtractOrderIdTool),
        Arc::new(GetOrderStatusTool::new(Arc::new(halo_commerce::MockStorefront))),
    ]
}

fn agent(model: Arc<MockLlm>, tools: Vec<Arc<dyn Tool>>) -> ReactAgent {
    ReactAgent::builder("order_status")
        .instruction("Keep answers brief.")
        .temperature(0.0)
        .tools(tools)
        .model(model as Arc<dyn Llm>)
        .build()
        .unwrap()
}

fn prompt_of(model: &MockLlm, call: usize) -> String {
    model.requests()[call].contents[0].text()
}

#[tokio::test]
async fn extracts_then_looks_up_order() {
    let model = Arc::new(
        MockLlm::new("mock")
            .with_text("Thought: I need the order id\nAction: extract_order_id\nAction Input: Status pesanan #12345 ya")
            .with_text("Thought: look it up\nAction: get_order_status\nAction Input: 12345")
            .with_text("Thought: I now know the final answer\nFinal Answer: Pesanan 12345 sedang dikirim."),
    );
    let agent = agent(model.clone(), order_tools());

    let answer = agent.run(ctx(), "Status pesanan #12345 ya").await.unwrap();
    assert_eq!(answer, "Pesanan 12345 sedang dikirim.");
    assert_eq!(model.call_count(), 3);

    let second = prompt_of(&model, 1);
    assert!(second.contains("Question: Status pesanan #12345 ya"));
    assert!(second.contains("Action: extract_order_id\nAction Input: Status pesanan #12345 ya\nObservation: 12345\nThought: "));

    let third = prompt_of(&model, 2);
    assert!(third.contains("\"status\":\"in_transit\""));
}

#[tokio::test]
async fn requests_use_agent_temperature_and_stop() {
    let model = Arc::new(MockLlm::new("mock").with_text("Final Answer: ok"));
    let agent = ReactAgent::builder("general_qa")
        .temperature(0.2)
        .model(model.clone() as Arc<dyn Llm>)
        .build()
        .unwrap();

    agent.run(ctx(), "hi").await.unwrap();
    let request = &model.requests()[0];
    let config = request.config.clone().unwrap();
    assert_eq!(config.temperature, Some(0.2));
    assert_eq!(config.stop, Some(vec![OBSERVATION_STOP.to_string()]));
}

#[tokio::test]
async fn malformed_steps_are_fed_back_then_fail() {
    let model = Arc::new(MockLlm::new("mock").with_default("I think it is on the way"));
    let agent = agent(model.clone(), order_tools());

    let err = agent.run(ctx(), "where is my order").await.unwrap_err();
    assert!(matches!(err, AgentError::OutputParse { ref raw } if raw == "I think it is on the way"));
    assert!(err.is_output_parse());
    assert_eq!(model.call_count(), 3);
    assert!(prompt_of(&model, 1).contains("Observation: Invalid Format: Missing 'Action:' after 'Thought:'"));
}

#[tokio::test]
async fn recovers_after_one_malformed_step() {
    let model = Arc::new(
        MockLlm::new("mock")
            .with_text("Thought: hmm\nAction: get_order_status")
            .with_text("Thought: I now know the final answer\nFinal Answer: Mohon kirim nomor pesanan."),
    );
    let agent = agent(model.clone(), order_tools());

    let answer = agent.run(ctx(), "cek pesanan").await.unwrap();
    assert_eq!(answer, "Mohon kirim nomor pesanan.");
    assert!(prompt_of(&model, 1).contains("Invalid Format: Missing 'Action Input:' after 'Action:'"));
}

#[tokio::test]
async fn unknown_tool_exhausts_iterations() {
    let model = Arc::new(
        MockLlm::new("mock").with_default("Thought: search\nAction: web_search\nAction Input: order 12345"),
    );
    let agent = agent(model.clone(), order_tools());

    let err = agent.run(ctx(), "order 12345").await.unwrap_err();
    assert!(matches!(err, AgentError::IterationLimit { iterations: 3 }));
    assert!(prompt_of(&model, 1).contains(
        "Observation: web_search is not a valid tool, try one of [extract_order_id, get_order_status]."
    ));
}

#[tokio::test]
async fn tool_errors_become_observations() {
    let failing: Arc<dyn Tool> = Arc::new(FunctionTool::new(
        "get_order_status",
        "Look up an order",
        |_ctx, _args| async { Err::<Value, _>(HaloError::Tool("shopify returned 503".into())) },
    ));
    let model = Arc::new(
        MockLlm::new("mock")
            .with_text("Action: get_order_status\nAction Input: 12345")
            .with_text("Final Answer: Sistem pesanan sedang gangguan."),
    );
    let agent = agent(model.clone(), vec![failing]);

    let answer = agent.run(ctx(), "12345").await.unwrap();
    assert_eq!(answer, "Sistem pesanan sedang gangguan.");
    assert!(prompt_of(&model, 1).contains("shopify returned 503"));
}

#[tokio::test]
async fn json_action_input_reaches_tool_as_object() {
    let echo: Arc<dyn Tool> = Arc::new(FunctionTool::new("echo", "Echo", |_ctx, args| async move {
        Ok(json!({ "got": args }))
    }));
    let model = Arc::new(
        MockLlm::new("mock")
            .with_text("Action: echo\nAction Input: {\"query\": \"sepatu\", \"k\": 2}")
            .with_text("Final Answer: done"),
    );
    let agent = agent(model.clone(), vec![echo]);

    agent.run(ctx(), "x").await.unwrap();
    let prompt = prompt_of(&model, 1);
    assert!(prompt.contains("\"k\":2"));
    assert!(prompt.contains("\"query\":\"sepatu\""));
}

#[tokio::test]
async fn model_failure_is_reported() {
    let model = Arc::new(MockLlm::new("mock").with_error("rate limited"));
    let agent = agent(model, order_tools());

    let err = agent.run(ctx(), "order 12345").await.unwrap_err();
    assert!(matches!(err, AgentError::Model(ref m) if m.contains("rate limited")));
    assert!(!err.is_output_parse());
}

#[test]
fn build_requires_model() {
    let err = ReactAgent::builder("orphan").build().err().unwrap();
    assert!(matches!(err, HaloError::Agent(_)));
}
