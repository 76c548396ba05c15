use axum::{extract::State, middleware::from_fn, routing::post, Extension, Json, Router};
use axum_extra::extract::WithRejection;
use shopdesk_catalog::{VariantId, VariantPatch};
use shopdesk_core::VariantUpdateOutcome;
use shopdesk_shared::{BulkVariantUpdateRequest, BulkVariantUpdateResponse, UpdatedVariant, VariantUpdateResult};

use crate::{
    error::AppError,
    middleware::auth::{require_variants_write, OperatorClaims},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/bulk-variant-update",
        post(bulk_variant_update).layer(from_fn(require_variants_write)),
    )
}

/// POST /bulk-variant-update
/// Applies each patch independently and reports the outcome per item, in request order
pub async fn bulk_variant_update(
    State(state): State<AppState>,
    Extension(claims): Extension<OperatorClaims>,
    WithRejection(Json(req), _): WithRejection<Json<BulkVariantUpdateRequest>, AppError>,
) -> Result<Json<BulkVariantUpdateResponse>, AppError> {
    tracing::info!("{} submitted bulk update of {} variants", claims.sub, req.variants.len());

    let patches = req
        .variants
        .into_iter()
        .map(|item| VariantPatch {
            variant_id: VariantId(item.variant_id),
            stock: item.stock,
            price: item.price,
        })
        .collect();

    let report = state.catalog.bulk_update_variants(patches).await?;

    let results: Vec<VariantUpdateResult> = report
        .items
        .iter()
        .map(|item| match item {
            VariantUpdateOutcome::Updated(v) => VariantUpdateResult::Updated {
                variant_id: v.id.0,
                stock: v.stock,
                price: v.price,
            },
            VariantUpdateOutcome::Failed { variant_id, reason } => VariantUpdateResult::Failed {
                variant_id: variant_id.0,
                reason: *reason,
            },
        })
        .collect();

    let updated_variants = report
        .updated()
        .map(|v| UpdatedVariant { variant_id: v.id.0, stock: v.stock, price: v.price })
        .collect();

    Ok(Json(BulkVariantUpdateResponse {
        status: report.status(),
        updated_variants,
        results,
    }))
}
