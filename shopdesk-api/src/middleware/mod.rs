pub mod auth;

pub use auth::{
    has_permission, operator_auth_middleware, require_permission, require_prices_read, require_variants_write,
    OperatorClaims,
};
