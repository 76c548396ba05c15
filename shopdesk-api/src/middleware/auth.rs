use axum::{
    extract::{Request, State},
    Extension,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::{AppState, AuthConfig}};

/// Permission to submit bulk stock/price changes.
pub const VARIANTS_WRITE: &str = "variants:write";
/// Permission to run the bulk price calculator.
pub const PRICES_READ: &str = "prices:read";

/// Roles that implicitly hold every permission.
const PRIVILEGED_ROLES: [&str; 2] = ["ADMIN", "SHOP_MANAGER"];

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OperatorClaims {
    pub sub: String,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub exp: usize,
    pub jti: String,
}

pub fn decode_claims(token: &str, auth: &AuthConfig) -> Result<OperatorClaims, AppError> {
    decode::<OperatorClaims>(
        token,
        &DecodingKey::from_secret(auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("Rejected bearer token: {}", e);
        AppError::AuthenticationError("Invalid or expired token".to_string())
    })
}

// ============================================================================
// Operator Authentication Middleware
// ============================================================================

pub async fn operator_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // 1. Extract bearer token
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| AppError::AuthenticationError("Missing bearer token".to_string()))?;

    // 2. Decode and validate JWT
    let claims = decode_claims(bearer.token(), &state.auth)?;

    // 3. Inject claims for handlers
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

// ============================================================================
// Permission Check Helpers
// ============================================================================

pub fn has_permission(claims: &OperatorClaims, permission: &str) -> bool {
    PRIVILEGED_ROLES.contains(&claims.role.as_str()) || claims.permissions.iter().any(|p| p == permission)
}

pub fn require_permission(claims: &OperatorClaims, permission: &str) -> Result<(), AppError> {
    if has_permission(claims, permission) {
        Ok(())
    } else {
        tracing::warn!("{} ({}) lacks permission {}", claims.sub, claims.role, permission);
        Err(AppError::AuthorizationError(format!("Missing permission: {}", permission)))
    }
}

// ============================================================================
// Route Guards
// ============================================================================

// Run after `operator_auth_middleware` and before the body is read, so a caller
// without the permission gets 403 whatever the payload.

pub async fn require_variants_write(
    Extension(claims): Extension<OperatorClaims>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_permission(&claims, VARIANTS_WRITE)?;
    Ok(next.run(req).await)
}

pub async fn require_prices_read(
    Extension(claims): Extension<OperatorClaims>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_permission(&claims, PRICES_READ)?;
    Ok(next.run(req).await)
}
