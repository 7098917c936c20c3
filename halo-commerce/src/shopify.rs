use crate::config::ShopifyConfig;
use crate::error::{CommerceError, Result};
use crate::http::{build_client, id_string, opt_string, send_json};
use crate::storefront::{OrderStatus, ProductSummary, Storefront};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

const PROVIDER: &str = "shopify";

/// Shopify Admin REST API, version 2024-01.
pub struct ShopifyStorefront {
    client: Client,
    config: ShopifyConfig,
    api_base: String,
}

impl ShopifyStorefront {
    pub fn new(config: ShopifyConfig, timeout_secs: u64) -> Result<Self> {
        if config.store_domain.is_empty() || config.access_token.is_empty() {
            return Err(CommerceError::NotConfigured("Shopify"));
        }
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| format!("https://{}/admin/api/2024-01", config.store_domain));
        Ok(Self {
            client: build_client(PROVIDER, timeout_secs)?,
            api_base: api_base.trim_end_matches('/').to_string(),
            config,
        })
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{path}", self.api_base))
            .header("X-Shopify-Access-Token", &self.config.access_token)
            .header("Content-Type", "application/json")
    }
}

#[async_trait]
impl Storefront for ShopifyStorefront {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn get_order_status(&self, order_id: &str) -> Result<OrderStatus> {
        let body = send_json(PROVIDER, self.get(&format!("/orders/{order_id}.json"))).await?;
        let order = body.get("order").cloned().unwrap_or(Value::Null);
        Ok(OrderStatus::new(order_id)
            .with("fulfillment_status", order.get("fulfillment_status").cloned().unwrap_or(Value::Null))
            .with("financial_status", order.get("financial_status").cloned().unwrap_or(Value::Null)))
    }

    async fn search_products(&self, query: &str, limit: usize) -> Result<Vec<ProductSummary>> {
        let request = self
            .get("/products.json")
            .query(&[("limit", limit.to_string()), ("title", query.to_string())]);
        let body = send_json(PROVIDER, request).await?;
        let products = body.get("products").and_then(Value::as_array).cloned().unwrap_or_default();

        Ok(products
            .iter()
            .map(|p| {
                let handle = p.get("handle").and_then(Value::as_str).unwrap_or_default();
                ProductSummary {
                    id: id_string(p.get("id")),
                    title: opt_string(p.get("title")),
                    url: Some(format!("https://{}/products/{handle}", self.config.store_domain)),
                    size: None,
                }
            })
            .collect())
    }
}
