use crate::config::CommerceConfig;
use crate::error::Result;
use crate::marketplace::{ShopeeStorefront, TokopediaStorefront};
use crate::mock::MockStorefront;
use crate::shopify::ShopifyStorefront;
use crate::storefront::{OrderStatus, ProductSummary, Storefront};
use crate::woocommerce::WooCommerceStorefront;
use async_trait::async_trait;
use tracing::{info, warn};

/// The active storefront, selected once at startup.
pub enum CommerceProvider {
    Shopify(ShopifyStorefront),
    WooCommerce(WooCommerceStorefront),
    Shopee(ShopeeStorefront),
    Tokopedia(TokopediaStorefront),
    Mock(MockStorefront),
}

impl CommerceProvider {
    /// First fully configured platform in priority order, else the mock.
    /// A platform whose client cannot be built is skipped.
    pub fn from_config(config: &CommerceConfig) -> Self {
        let provider = Self::select(config);
        info!(provider = provider.name(), "selected commerce provider");
        provider
    }

    fn select(config: &CommerceConfig) -> Self {
        if let Some(shopify) = &config.shopify {
            match ShopifyStorefront::new(shopify.clone(), config.timeout_secs) {
                Ok(store) => return Self::Shopify(store),
                Err(e) => warn!(error = %e, "skipping Shopify"),
            }
        }
        if let Some(woo) = &config.woocommerce {
            match WooCommerceStorefront::new(woo.clone(), config.timeout_secs) {
                Ok(store) => return Self::WooCommerce(store),
                Err(e) => warn!(error = %e, "skipping WooCommerce"),
            }
        }
        if let Some(shopee) = &config.shopee {
            return Self::Shopee(ShopeeStorefront::new(shopee.clone()));
        }
        if let Some(tokopedia) = &config.tokopedia {
            return Self::Tokopedia(TokopediaStorefront::new(tokopedia.clone()));
        }
        Self::Mock(MockStorefront)
    }

    fn inner(&self) -> &dyn Storefront {
        match self {
            Self::Shopify(s) => s,
            Self::WooCommerce(s) => s,
            Self::Shopee(s) => s,
            Self::Tokopedia(s) => s,
            Self::Mock(s) => s,
        }
    }
}

impl Default for CommerceProvider {
    fn default() -> Self {
        Self::Mock(MockStorefront)
    }
}

#[async_trait]
impl Storefront for CommerceProvider {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    async fn get_order_status(&self, order_id: &str) -> Result<OrderStatus> {
        self.inner().get_order_status(order_id).await
    }

    async fn search_products(&self, query: &str, limit: usize) -> Result<Vec<ProductSummary>> {
        self.inner().search_products(query, limit).await
    }
}
