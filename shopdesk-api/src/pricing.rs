use axum::{extract::State, middleware::from_fn, routing::post, Extension, Json, Router};
use axum_extra::extract::WithRejection;
use shopdesk_catalog::{BulkQuote, VariantId};
use shopdesk_core::{PriceOutcome, PriceRequest};
use shopdesk_shared::{BulkPriceEntry, BulkPriceRequest, BulkPriceResponse, BulkPriceResult};

use crate::{
    error::AppError,
    middleware::auth::{require_prices_read, OperatorClaims},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/bulk-price-calculator",
        post(bulk_price_calculator).layer(from_fn(require_prices_read)),
    )
}

/// POST /bulk-price-calculator
pub async fn bulk_price_calculator(
    State(state): State<AppState>,
    Extension(claims): Extension<OperatorClaims>,
    WithRejection(Json(req), _): WithRejection<Json<BulkPriceRequest>, AppError>,
) -> Result<Json<BulkPriceResponse>, AppError> {
    tracing::debug!("{} requested {} bulk quotes", claims.sub, req.variants.len());

    let requests = req
        .variants
        .iter()
        .map(|item| PriceRequest { variant_id: VariantId(item.variant_id), quantity: item.quantity })
        .collect();

    let report = state.catalog.bulk_price(requests).await?;

    let bulk_prices = report.quoted().map(|(id, quote)| price_entry(id, quote)).collect();
    let results = report
        .items
        .iter()
        .map(|item| match item {
            PriceOutcome::Quoted { variant_id, quote } => BulkPriceResult::Quoted(price_entry(*variant_id, quote)),
            PriceOutcome::Failed { variant_id, quantity, reason } => BulkPriceResult::Failed {
                variant_id: variant_id.0,
                quantity: *quantity,
                reason: *reason,
            },
        })
        .collect();

    Ok(Json(BulkPriceResponse {
        status: report.status(),
        bulk_prices,
        results,
    }))
}

fn price_entry(variant_id: VariantId, quote: &BulkQuote) -> BulkPriceEntry {
    BulkPriceEntry {
        variant_id: variant_id.0,
        quantity: quote.quantity,
        bulk_price: quote.unit_price,
        base_price: quote.base_price,
        discount_rate: quote.discount_rate,
        total_price: quote.total_price,
    }
}
