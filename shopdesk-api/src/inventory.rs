use axum::{extract::State, routing::get, Json, Router};
use shopdesk_catalog::StockLevel;
use shopdesk_shared::{InventoryStatusEntry, InventorySummaryResponse};

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/inventory-status", get(inventory_status))
        .route("/inventory-summary", get(inventory_summary))
}

/// GET /inventory-status
pub async fn inventory_status(State(state): State<AppState>) -> Result<Json<Vec<InventoryStatusEntry>>, AppError> {
    let levels = state.catalog.inventory_status().await?;
    Ok(Json(levels.into_iter().map(status_entry).collect()))
}

/// GET /inventory-summary
/// Aggregate counts, recomputed on every call
pub async fn inventory_summary(State(state): State<AppState>) -> Result<Json<InventorySummaryResponse>, AppError> {
    let snapshot = state.catalog.inventory_snapshot().await?;

    Ok(Json(InventorySummaryResponse {
        generated_at: snapshot.generated_at,
        total_products: snapshot.total_products,
        total_stock: snapshot.total_stock,
        in_stock: snapshot.in_stock,
        low_stock: snapshot.low_stock,
        out_of_stock: snapshot.out_of_stock,
        products: snapshot.products.into_iter().map(status_entry).collect(),
    }))
}

fn status_entry(level: StockLevel) -> InventoryStatusEntry {
    InventoryStatusEntry {
        product_id: level.product_id.0,
        name: level.name,
        stock: level.stock,
        status: level.status.label().to_string(),
    }
}
