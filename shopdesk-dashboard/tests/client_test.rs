use std::sync::Arc;

use rust_decimal_macros::dec;
use shopdesk_api::{app, auth::issue_token, AppState, AuthConfig};
use shopdesk_catalog::DiscountSchedule;
use shopdesk_core::CatalogService;
use shopdesk_dashboard::{views, watch, ApiClient, DashboardError};
use shopdesk_shared::{BatchStatus, BulkPriceItem, BulkPriceResult, FailureReason, VariantUpdateItem, VariantUpdateResult};
use shopdesk_store::MemoryCatalog;

const SEED: &str = r#"{
    "products": [
        {"id": 1, "name": "Hoodie", "kind": "variable", "variants": [
            {"id": 11, "sku": "HD-M", "stock": 5, "price": "100.00"},
            {"id": 12, "sku": "HD-L", "stock": 0, "price": "50.00"}
        ]},
        {"id": 2, "name": "", "kind": "simple", "stock": 30}
    ]
}"#;

fn auth() -> AuthConfig {
    AuthConfig { secret: "dashboard-secret".to_string(), expiration: 300 }
}

/// Serve the API on an ephemeral port and return its root URL.
async fn spawn_server() -> String {
    let store = Arc::new(MemoryCatalog::from_json(SEED).unwrap());
    let catalog = CatalogService::new(store.clone(), store, DiscountSchedule::default());
    let router = app(AppState { catalog: Arc::new(catalog), auth: auth() });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

fn manager_client(base_url: &str) -> ApiClient {
    let token = issue_token(&auth(), "dashboard", "SHOP_MANAGER", vec![], None).unwrap();
    ApiClient::new(base_url).with_token(token)
}

#[tokio::test]
async fn test_stock_round_trip() {
    let base_url = spawn_server().await;
    let client = manager_client(&base_url);

    let products = client.get_products().await.unwrap();
    assert_eq!(products[0].variants[0].stock, Some(5));

    let response = client
        .update_variants(vec![VariantUpdateItem { variant_id: 11, stock: Some(64), price: Some(dec!(99.99)) }])
        .await
        .unwrap();
    assert_eq!(response.status, BatchStatus::Success);

    let products = client.get_products().await.unwrap();
    assert_eq!(products[0].variants[0].stock, Some(64));
    assert_eq!(products[0].variants[0].price, Some(dec!(99.99)));
}

#[tokio::test]
async fn test_unknown_variant_reported_per_item() {
    let base_url = spawn_server().await;
    let client = manager_client(&base_url);

    let response = client
        .update_variants(vec![
            VariantUpdateItem { variant_id: 12, stock: Some(3), price: None },
            VariantUpdateItem { variant_id: 4040, stock: Some(3), price: None },
        ])
        .await
        .unwrap();

    assert_eq!(response.status, BatchStatus::Partial);
    assert_eq!(
        response.results[1],
        VariantUpdateResult::Failed { variant_id: 4040, reason: FailureReason::NotFound }
    );
}

#[tokio::test]
async fn test_bulk_prices_through_client() {
    let base_url = spawn_server().await;
    let client = manager_client(&base_url);

    let response = client
        .calculate_bulk_prices(vec![
            BulkPriceItem { variant_id: 11, quantity: 50 },
            BulkPriceItem { variant_id: 12, quantity: 20 },
        ])
        .await
        .unwrap();

    assert_eq!(response.bulk_prices[0].bulk_price, dec!(90.00));
    assert_eq!(response.bulk_prices[1].bulk_price, dec!(47.50));
    assert!(matches!(&response.results[1], BulkPriceResult::Quoted(entry) if entry.total_price == dec!(950.00)));
}

#[tokio::test]
async fn test_missing_token_is_api_error() {
    let base_url = spawn_server().await;
    let client = ApiClient::new(&base_url);

    let err = client
        .calculate_bulk_prices(vec![BulkPriceItem { variant_id: 11, quantity: 1 }])
        .await
        .unwrap_err();

    match err {
        DashboardError::Api { status, ref message } => {
            assert_eq!(status, 401);
            assert!(!message.is_empty());
        }
        other => panic!("expected API error, got {:?}", other),
    }
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_inventory_views_against_server() {
    let base_url = spawn_server().await;
    let client = ApiClient::new(&base_url);

    let frame = watch::inventory_frame(&client).await;
    assert!(frame.contains("Hoodie"));
    assert!(frame.contains("Unnamed Product"));
    assert!(frame.contains("Total: 2 | In Stock: 1 | Low Stock: 1 | Out of Stock: 0"));

    let summary = client.get_inventory_summary().await.unwrap();
    assert_eq!(summary.total_stock, 35);
    assert!(views::render_summary(&summary).contains("35 units on hand"));
}

#[tokio::test]
async fn test_unreachable_server_is_transient() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(format!("http://{}", addr));
    let err = client.get_products().await.unwrap_err();
    assert!(matches!(err, DashboardError::Network(_)));
    assert!(err.is_transient());

    // The watch loop renders the failure instead of stopping
    assert!(watch::inventory_frame(&client).await.starts_with("Error: network error"));
}
