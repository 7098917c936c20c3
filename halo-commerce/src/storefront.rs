use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Order lookup result. Fields beyond `order_id` depend on the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatus {
    pub order_id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl OrderStatus {
    pub fn new(order_id: impl Into<String>) -> Self {
        Self { order_id: order_id.into(), fields: Map::new() }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Capability set shared by every storefront platform.
#[async_trait]
pub trait Storefront: Send + Sync {
    fn name(&self) -> &'static str;

    async fn get_order_status(&self, order_id: &str) -> Result<OrderStatus>;

    async fn search_products(&self, query: &str, limit: usize) -> Result<Vec<ProductSummary>>;
}
