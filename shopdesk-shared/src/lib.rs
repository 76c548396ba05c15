pub mod models;

pub use models::bulk::*;
pub use models::catalog::*;
pub use models::ErrorResponse;

/// Every catalog endpoint lives under this prefix.
pub const API_BASE_PATH: &str = "/custom-shop/v1";
