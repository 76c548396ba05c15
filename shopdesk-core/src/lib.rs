pub mod repository;
pub mod service;

pub use repository::{BulkRuleRepository, CatalogRepository, PatchOutcome, VariantLookup};
pub use service::{
    BulkPriceReport, BulkUpdateReport, CatalogService, PriceOutcome, PriceRequest, ProductListing,
    VariantUpdateOutcome,
};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
