use crate::config::WooCommerceConfig;
use crate::error::{CommerceError, Result};
use crate::http::{build_client, id_string, opt_string, send_json};
use crate::storefront::{OrderStatus, ProductSummary, Storefront};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

const PROVIDER: &str = "woocommerce";

/// WooCommerce REST API v3 with key/secret query authentication.
pub struct WooCommerceStorefront {
    client: Client,
    config: WooCommerceConfig,
}

impl WooCommerceStorefront {
    pub fn new(config: WooCommerceConfig, timeout_secs: u64) -> Result<Self> {
        if config.base_url.is_empty() || config.consumer_key.is_empty() || config.consumer_secret.is_empty() {
            return Err(CommerceError::NotConfigured("WooCommerce"));
        }
        Ok(Self { client: build_client(PROVIDER, timeout_secs)?, config })
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let base = self.config.base_url.trim_end_matches('/');
        self.client.get(format!("{base}/wp-json/wc/v3{path}")).query(&[
            ("consumer_key", self.config.consumer_key.as_str()),
            ("consumer_secret", self.config.consumer_secret.as_str()),
        ])
    }
}

#[async_trait]
impl Storefront for WooCommerceStorefront {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn get_order_status(&self, order_id: &str) -> Result<OrderStatus> {
        let body = send_json(PROVIDER, self.get(&format!("/orders/{order_id}"))).await?;
        Ok(OrderStatus::new(order_id)
            .with("status", body.get("status").cloned().unwrap_or(Value::Null))
            .with("total", body.get("total").cloned().unwrap_or(Value::Null)))
    }

    async fn search_products(&self, query: &str, limit: usize) -> Result<Vec<ProductSummary>> {
        let request = self
            .get("/products")
            .query(&[("search", query.to_string()), ("per_page", limit.to_string())]);
        let body = send_json(PROVIDER, request).await?;
        let items = body.as_array().ok_or(CommerceError::Decode {
            provider: PROVIDER,
            message: "expected a product array".to_string(),
        })?;

        Ok(items
            .iter()
            .map(|p| ProductSummary {
                id: id_string(p.get("id")),
                title: opt_string(p.get("name")),
                url: opt_string(p.get("permalink")),
                size: None,
            })
            .collect())
    }
}
