//! # halo-commerce
//!
//! Storefront integrations behind two operations: order status and product
//! search. Exactly one [`CommerceProvider`] is active per process, chosen by
//! [`CommerceProvider::from_config`] in the order Shopify, WooCommerce,
//! Shopee, Tokopedia, falling back to [`MockStorefront`].

pub mod config;
pub mod error;
mod http;
pub mod marketplace;
pub mod mock;
pub mod provider;
pub mod shopify;
pub mod storefront;
pub mod woocommerce;

pub use config::{CommerceConfig, ShopeeConfig, ShopifyConfig, TokopediaConfig, WooCommerceConfig};
pub use error::{CommerceError, Result};
pub use marketplace::{ShopeeStorefront, TokopediaStorefront};
pub use mock::MockStorefront;
pub use provider::CommerceProvider;
pub use shopify::ShopifyStorefront;
pub use storefront::{DEFAULT_SEARCH_LIMIT, OrderStatus, ProductSummary, Storefront};
pub use woocommerce::WooCommerceStorefront;
