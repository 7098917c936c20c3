//! Marketplace adapters whose OAuth flows are not wired yet. They report an
//! `unknown` status so the agent can still answer.

use crate::config::{ShopeeConfig, TokopediaConfig};
use crate::error::Result;
use crate::storefront::{OrderStatus, ProductSummary, Storefront};
use async_trait::async_trait;

pub struct ShopeeStorefront {
    config: ShopeeConfig,
}

impl ShopeeStorefront {
    pub fn new(config: ShopeeConfig) -> Self {
        Self { config }
    }

    pub fn shop_id(&self) -> &str {
        &self.config.shop_id
    }
}

#[async_trait]
impl Storefront for ShopeeStorefront {
    fn name(&self) -> &'static str {
        "shopee"
    }

    async fn get_order_status(&self, order_id: &str) -> Result<OrderStatus> {
        Ok(OrderStatus::new(order_id).with("status", "unknown").with("note", "Shopee adapter stub"))
    }

    async fn search_products(&self, _query: &str, _limit: usize) -> Result<Vec<ProductSummary>> {
        Ok(Vec::new())
    }
}

pub struct TokopediaStorefront {
    config: TokopediaConfig,
}

impl TokopediaStorefront {
    pub fn new(config: TokopediaConfig) -> Self {
        Self { config }
    }

    pub fn merchant_id(&self) -> &str {
        &self.config.merchant_id
    }
}

#[async_trait]
impl Storefront for TokopediaStorefront {
    fn name(&self) -> &'static str {
        "tokopedia"
    }

    async fn get_order_status(&self, order_id: &str) -> Result<OrderStatus> {
        Ok(OrderStatus::new(order_id).with("status", "unknown").with("note", "Tokopedia adapter stub"))
    }

    async fn search_products(&self, _query: &str, _limit: usize) -> Result<Vec<ProductSummary>> {
        Ok(Vec::new())
    }
}
