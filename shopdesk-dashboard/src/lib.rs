pub mod client;
pub mod error;
pub mod validate;
pub mod views;
pub mod watch;

pub use client::ApiClient;
pub use error::DashboardError;
