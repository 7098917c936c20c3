use crate::error::Result;
use crate::storefront::{OrderStatus, ProductSummary, Storefront};
use async_trait::async_trait;

/// Deterministic storefront used when no platform is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockStorefront;

#[async_trait]
impl Storefront for MockStorefront {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get_order_status(&self, order_id: &str) -> Result<OrderStatus> {
        Ok(OrderStatus::new(order_id).with("status", "in_transit").with("eta", "tomorrow"))
    }

    async fn search_products(&self, query: &str, _limit: usize) -> Result<Vec<ProductSummary>> {
        tracing::debug!(query, "mock product search");
        Ok(vec![ProductSummary {
            id: "sku-blue-shirt".to_string(),
            title: Some("Blue Casual Shirt".to_string()),
            url: Some("https://example.com/product/blue-shirt".to_string()),
            size: Some("L".to_string()),
        }])
    }
}
