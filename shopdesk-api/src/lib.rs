use axum::{
    routing::get,
    Router,
    http::Method,
    Json,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod error;
pub mod inventory;
pub mod middleware;
pub mod pricing;
pub mod products;
pub mod state;
pub mod variants;

pub use shopdesk_shared::API_BASE_PATH;
pub use state::{AppState, AuthConfig};

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    // Mutating and pricing endpoints require an operator token
    let protected = Router::new()
        .merge(variants::routes())
        .merge(pricing::routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::operator_auth_middleware,
        ));

    let api = Router::new()
        .merge(products::routes())
        .merge(inventory::routes())
        .merge(protected);

    Router::new()
        .route("/health", get(health))
        .nest(API_BASE_PATH, api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
