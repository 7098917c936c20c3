use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopifyConfig {
    pub store_domain: String,
    pub access_token: String,
    /// Admin API root. Defaults to `https://{store_domain}/admin/api/2024-01`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WooCommerceConfig {
    pub base_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopeeConfig {
    pub partner_id: String,
    pub partner_key: String,
    pub shop_id: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokopediaConfig {
    pub client_id: String,
    pub client_secret: String,
    pub merchant_id: String,
    pub base_url: String,
}

/// Storefront credentials. A platform is only considered configured when
/// every one of its fields is present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommerceConfig {
    pub shopify: Option<ShopifyConfig>,
    pub woocommerce: Option<WooCommerceConfig>,
    pub shopee: Option<ShopeeConfig>,
    pub tokopedia: Option<TokopediaConfig>,
    pub timeout_secs: u64,
}

impl Default for CommerceConfig {
    fn default() -> Self {
        Self { shopify: None, woocommerce: None, shopee: None, tokopedia: None, timeout_secs: 20 }
    }
}

fn all_set(values: &[&Option<String>]) -> bool {
    values.iter().all(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
}

impl CommerceConfig {
    /// Build from a key lookup such as `std::env::var(..).ok()`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let (domain, token) = (get("SHOPIFY_STORE_DOMAIN"), get("SHOPIFY_ACCESS_TOKEN"));
        let shopify = all_set(&[&domain, &token]).then(|| ShopifyConfig {
            store_domain: domain.unwrap_or_default(),
            access_token: token.unwrap_or_default(),
            api_base: None,
        });

        let (woo_url, woo_key, woo_secret) =
            (get("WOO_BASE_URL"), get("WOO_CONSUMER_KEY"), get("WOO_CONSUMER_SECRET"));
        let woocommerce = all_set(&[&woo_url, &woo_key, &woo_secret]).then(|| WooCommerceConfig {
            base_url: woo_url.unwrap_or_default(),
            consumer_key: woo_key.unwrap_or_default(),
            consumer_secret: woo_secret.unwrap_or_default(),
        });

        let shopee_vals = (
            get("SHOPEE_PARTNER_ID"),
            get("SHOPEE_PARTNER_KEY"),
            get("SHOPEE_SHOP_ID"),
            get("SHOPEE_BASE_URL"),
        );
        let shopee = all_set(&[&shopee_vals.0, &shopee_vals.1, &shopee_vals.2, &shopee_vals.3]).then(|| {
            ShopeeConfig {
                partner_id: shopee_vals.0.unwrap_or_default(),
                partner_key: shopee_vals.1.unwrap_or_default(),
                shop_id: shopee_vals.2.unwrap_or_default(),
                base_url: shopee_vals.3.unwrap_or_default(),
            }
        });

        let toko_vals = (
            get("TOKO_CLIENT_ID"),
            get("TOKO_CLIENT_SECRET"),
            get("TOKO_MERCHANT_ID"),
            get("TOKO_BASE_URL"),
        );
        let tokopedia = all_set(&[&toko_vals.0, &toko_vals.1, &toko_vals.2, &toko_vals.3]).then(|| {
            TokopediaConfig {
                client_id: toko_vals.0.unwrap_or_default(),
                client_secret: toko_vals.1.unwrap_or_default(),
                merchant_id: toko_vals.2.unwrap_or_default(),
                base_url: toko_vals.3.unwrap_or_default(),
            }
        });

        Self { shopify, woocommerce, shopee, tokopedia, ..Self::default() }
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
