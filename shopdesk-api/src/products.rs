use axum::{extract::State, routing::get, Json, Router};
use shopdesk_core::ProductListing;
use shopdesk_shared::{BulkPriceRuleResponse, ProductResponse, VariantResponse};

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/products", get(list_products))
}

/// GET /products
/// Published products with their variants and bulk price rules
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let listings = state.catalog.list_products().await?;
    tracing::debug!("Listing {} published products", listings.len());

    Ok(Json(listings.into_iter().map(product_response).collect()))
}

fn product_response(listing: ProductListing) -> ProductResponse {
    let ProductListing { product, bulk_prices } = listing;

    ProductResponse {
        product_id: product.id.0,
        name: product.name,
        variants: product
            .variants
            .into_iter()
            .map(|v| VariantResponse {
                variant_id: v.id.0,
                sku: v.sku,
                attributes: v.attributes,
                stock: v.stock,
                price: v.price,
            })
            .collect(),
        bulk_prices: bulk_prices
            .into_iter()
            .map(|r| BulkPriceRuleResponse { min_quantity: r.min_quantity, price: r.price })
            .collect(),
    }
}
