use halo_commerce::*;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn shopify(server: &MockServer) -> ShopifyStorefront {
    ShopifyStorefront::new(
        ShopifyConfig {
            store_domain: "demo.myshopify.com".into(),
            access_token: "shpat_test".into(),
            api_base: Some(format!("{}/admin/api/2024-01", server.uri())),
        },
        5,
    )
    .unwrap()
}

fn woo(server: &MockServer) -> WooCommerceStorefront {
    WooCommerceStorefront::new(
        WooCommerceConfig {
            base_url: server.uri(),
            consumer_key: "ck_test".into(),
            consumer_secret: "cs_test".into(),
        },
        5,
    )
    .unwrap()
}

#[tokio::test]
async fn shopify_order_status_maps_fulfillment_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/2024-01/orders/123456.json"))
        .and(header("X-Shopify-Access-Token", "shpat_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "order": {"id": 123456, "fulfillment_status": "fulfilled", "financial_status": "paid"}
        })))
        .mount(&server)
        .await;

    let status = shopify(&server).get_order_status("123456").await.unwrap();
    assert_eq!(
        serde_json::to_value(&status).unwrap(),
        json!({"order_id": "123456", "fulfillment_status": "fulfilled", "financial_status": "paid"})
    );
}

#[tokio::test]
async fn shopify_product_urls_use_store_domain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/2024-01/products.json"))
        .and(query_param("limit", "5"))
        .and(query_param("title", "blue shirt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{"id": 42, "title": "Blue Shirt", "handle": "blue-shirt"}]
        })))
        .mount(&server)
        .await;

    let items = shopify(&server).search_products("blue shirt", 5).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "42");
    assert_eq!(items[0].url.as_deref(), Some("https://demo.myshopify.com/products/blue-shirt"));
}

#[tokio::test]
async fn shopify_http_error_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/2024-01/orders/99999.json"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let err = shopify(&server).get_order_status("99999").await.unwrap_err();
    assert!(matches!(err, CommerceError::Status { status: 404, .. }));
}

#[tokio::test]
async fn woocommerce_order_status_uses_key_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/orders/55555"))
        .and(query_param("consumer_key", "ck_test"))
        .and(query_param("consumer_secret", "cs_test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 55555, "status": "processing", "total": "150000"})),
        )
        .mount(&server)
        .await;

    let status = woo(&server).get_order_status("55555").await.unwrap();
    assert_eq!(status.get("status").unwrap(), "processing");
    assert_eq!(status.get("total").unwrap(), "150000");
}

#[tokio::test]
async fn woocommerce_search_maps_name_and_permalink() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .and(query_param("search", "batik"))
        .and(query_param("per_page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "name": "Batik Shirt", "permalink": "https://woo.example.com/p/batik"}
        ])))
        .mount(&server)
        .await;

    let items = woo(&server).search_products("batik", 3).await.unwrap();
    assert_eq!(
        serde_json::to_value(&items).unwrap(),
        json!([{"id": "7", "title": "Batik Shirt", "url": "https://woo.example.com/p/batik"}])
    );
}
