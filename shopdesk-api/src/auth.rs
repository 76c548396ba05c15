use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use crate::{error::AppError, middleware::auth::OperatorClaims, state::AuthConfig};

/// Mint an operator token signed with the shared secret.
///
/// `ttl_seconds` falls back to the configured expiration.
pub fn issue_token(
    auth: &AuthConfig,
    subject: &str,
    role: &str,
    permissions: Vec<String>,
    ttl_seconds: Option<u64>,
) -> Result<String, AppError> {
    let ttl = ttl_seconds.unwrap_or(auth.expiration);
    let claims = OperatorClaims {
        sub: subject.to_owned(),
        role: role.to_owned(),
        permissions,
        exp: (Utc::now() + Duration::seconds(ttl as i64)).timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(auth.secret.as_bytes()))
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}
