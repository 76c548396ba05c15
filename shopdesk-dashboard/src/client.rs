use reqwest::RequestBuilder;
use serde::{de::DeserializeOwned, Serialize};
use shopdesk_shared::{
    BulkPriceItem, BulkPriceRequest, BulkPriceResponse, BulkVariantUpdateRequest, BulkVariantUpdateResponse,
    ErrorResponse, InventoryStatusEntry, InventorySummaryResponse, ProductResponse, VariantUpdateItem,
    API_BASE_PATH,
};

use crate::{error::DashboardError, validate};

/// HTTP client for the catalog endpoints.
///
/// Every call is a single request; nothing is retried.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_products(&self) -> Result<Vec<ProductResponse>, DashboardError> {
        self.get("/products").await
    }

    pub async fn get_inventory_status(&self) -> Result<Vec<InventoryStatusEntry>, DashboardError> {
        self.get("/inventory-status").await
    }

    pub async fn get_inventory_summary(&self) -> Result<InventorySummaryResponse, DashboardError> {
        self.get("/inventory-summary").await
    }

    pub async fn update_variants(
        &self,
        variants: Vec<VariantUpdateItem>,
    ) -> Result<BulkVariantUpdateResponse, DashboardError> {
        validate::update_batch(&variants)?;
        tracing::debug!("Submitting {} variant updates", variants.len());
        self.post("/bulk-variant-update", &BulkVariantUpdateRequest { variants }).await
    }

    pub async fn calculate_bulk_prices(
        &self,
        variants: Vec<BulkPriceItem>,
    ) -> Result<BulkPriceResponse, DashboardError> {
        validate::price_batch(&variants)?;
        self.post("/bulk-price-calculator", &BulkPriceRequest { variants }).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_BASE_PATH, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, DashboardError> {
        self.send(self.http.get(self.url(path))).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, DashboardError> {
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, mut req: RequestBuilder) -> Result<T, DashboardError> {
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(DashboardError::Api { status: status.as_u16(), message });
        }

        serde_json::from_slice(&body).map_err(|e| DashboardError::Decode(e.to_string()))
    }
}
