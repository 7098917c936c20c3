use crate::args::text_arg;
use async_trait::async_trait;
use halo_commerce::{DEFAULT_SEARCH_LIMIT, Storefront};
use halo_core::{HaloError, Result, Tool, ToolContext};
use serde_json::{Value, json};
use std::sync::Arc;

pub struct SearchProductsTool {
    store: Arc<dyn Storefront>,
    limit: usize,
}

impl SearchProductsTool {
    pub fn new(store: Arc<dyn Storefront>) -> Self {
        Self { store, limit: DEFAULT_SEARCH_LIMIT }
    }
}

#[async_trait]
impl Tool for SearchProductsTool {
    fn name(&self) -> &str {
        "search_products"
    }

    fn description(&self) -> &str {
        "Search products in catalog by a free-text query from active ecommerce provider. args: query : query to search product"
    }

    async fn execute(&self, _ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        let query = text_arg(&args, &["query", "q"]);
        let items = self.store.search_products(&query, self.limit).await?;
        Ok(json!({ "items": serde_json::to_value(items).map_err(HaloError::from)? }))
    }
}
