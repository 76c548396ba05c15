pub mod app_config;
pub mod database;
pub mod catalog_repo;
pub mod memory_repo;

pub use database::DbClient;
pub use catalog_repo::{PgBulkRuleRepository, PgCatalogRepository};
pub use memory_repo::{CatalogSeed, MemoryCatalog};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read seed file {path}: {source}")]
    SeedIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed seed data: {0}")]
    SeedFormat(#[from] serde_json::Error),

    #[error("Inconsistent seed data: {0}")]
    InvalidSeed(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}
