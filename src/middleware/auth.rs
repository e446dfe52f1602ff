use axum::{extract::FromRequestParts, http::request::Parts};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::error::ApiError;
use crate::models::auth::{AuthenticatedUser, Claims};

/// Extension type to carry the JWT secret through request extensions.
#[derive(Clone)]
pub struct JwtSecret(pub String);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthenticated)?;

        let secret = parts
            .extensions
            .get::<JwtSecret>()
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("JWT secret not configured")))?;

        decode_access_token(token, &secret.0)
    }
}

/// Validates signature and expiry. Missing, malformed, expired, and
/// badly-signed tokens all collapse into the same `Unauthenticated` error.
pub fn decode_access_token(token: &str, secret: &str) -> Result<AuthenticatedUser, ApiError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &key, &validation).map_err(|_| ApiError::Unauthenticated)?;
    let claims = data.claims;

    Ok(AuthenticatedUser {
        user_id: claims.sub.parse().map_err(|_| ApiError::Unauthenticated)?,
        role: claims.role,
    })
}
