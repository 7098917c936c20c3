use crate::args::text_arg;
use async_trait::async_trait;
use halo_commerce::Storefront;
use halo_core::{HaloError, Result, Tool, ToolContext};
use regex::Regex;
use serde_json::{Value, json};
use std::sync::{Arc, OnceLock};

fn order_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[#:]?(\d{5,})").expect("valid order id regex"))
}

/// First run of five or more digits, optionally prefixed by `#` or `:`.
/// Empty when there is none.
pub fn extract_order_id(text: &str) -> String {
    order_id_regex()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[derive(Debug, Default)]
pub struct ExtractOrderIdTool;

#[async_trait]
impl Tool for ExtractOrderIdTool {
    fn name(&self) -> &str {
        "extract_order_id"
    }

    fn description(&self) -> &str {
        "Extract an order id (5+ digits) from text. Return empty string if none found."
    }

    async fn execute(&self, _ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        Ok(Value::String(extract_order_id(&text_arg(&args, &["text"]))))
    }
}

pub struct GetOrderStatusTool {
    store: Arc<dyn Storefront>,
}

impl GetOrderStatusTool {
    pub fn new(store: Arc<dyn Storefront>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for GetOrderStatusTool {
    fn name(&self) -> &str {
        "get_order_status"
    }

    fn description(&self) -> &str {
        "Get order status for a given order_id from active ecommerce provider."
    }

    async fn execute(&self, _ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        let order_id = text_arg(&args, &["order_id", "id"]);
        if order_id.is_empty() {
            return Ok(json!({"error": "missing_order_id"}));
        }
        let status = self.store.get_order_status(&order_id).await?;
        serde_json::to_value(status).map_err(HaloError::from)
    }
}
