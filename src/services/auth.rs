use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use sqlx::PgPool;

use crate::{
    error::ApiError,
    models::{
        auth::Claims,
        user::{LoginResponse, RegisterRequest, User, UserProfile, UserRole},
    },
    services::users::UserService,
};

pub struct AuthService;

impl AuthService {
    /// Validate credentials and issue a token.
    ///
    /// Unknown email and wrong password fail with the same error so the
    /// endpoint never reveals which emails are registered.
    pub async fn login(
        pool: &PgPool,
        email: &str,
        password: &str,
        jwt_secret: &str,
        ttl_secs: u64,
    ) -> Result<LoginResponse, ApiError> {
        let user = UserService::get_by_email(pool, email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|_| ApiError::InvalidCredentials)?;
        if !valid {
            return Err(ApiError::InvalidCredentials);
        }

        sqlx::query("UPDATE users SET last_active = NOW() WHERE id = $1")
            .bind(user.id)
            .execute(pool)
            .await?;

        let token = Self::generate_access_token(&user, jwt_secret, ttl_secs)?;
        Ok(LoginResponse { user: user.into(), token })
    }

    /// Register a new account and log it in.
    pub async fn register(
        pool: &PgPool,
        req: &RegisterRequest,
        jwt_secret: &str,
        ttl_secs: u64,
    ) -> Result<LoginResponse, ApiError> {
        // Self-registration never grants admin.
        if req.role == UserRole::Admin {
            return Err(ApiError::Validation("Invalid role".to_string()));
        }
        if req.password.len() < 8 {
            return Err(ApiError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        if UserService::get_by_email(pool, &req.email).await?.is_some() {
            return Err(ApiError::Validation("Email already registered".to_string()));
        }

        // New accounts get a generated initials avatar.
        let profile_image = format!(
            "https://ui-avatars.com/api/?name={}+{}",
            req.first_name, req.last_name
        );
        let user = UserService::create(
            pool,
            &req.first_name,
            &req.last_name,
            &req.email,
            &req.password,
            req.role,
            Some(&profile_image),
        )
        .await?;

        let token = Self::generate_access_token(&user, jwt_secret, ttl_secs)?;
        Ok(LoginResponse { user: user.into(), token })
    }

    /// Current user as seen by `/api/auth/me`, fetched fresh, sans password.
    pub async fn me(pool: &PgPool, user_id: uuid::Uuid) -> Result<UserProfile, ApiError> {
        let user = UserService::get(pool, user_id)
            .await?
            .ok_or(ApiError::NotFound("User"))?;
        Ok(user.into())
    }

    /// Self-contained HS256 token carrying the identity the policy layer
    /// needs. Expiry is `ttl_secs` from issuance.
    pub fn generate_access_token(
        user: &User,
        secret: &str,
        ttl_secs: u64,
    ) -> Result<String, ApiError> {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role.parse().unwrap_or(UserRole::Parent),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            iat: now,
            exp: now + ttl_secs as usize,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::decode_access_token;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Maya".into(),
            last_name: "Chen".into(),
            email: "maya@example.com".into(),
            password_hash: "$2b$12$hash".into(),
            role: "teacher".into(),
            profile_image: None,
            theme: "system".into(),
            last_active: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trip() {
        let user = sample_user();
        let token = AuthService::generate_access_token(&user, "secret", 86400).unwrap();
        let decoded = decode_access_token(&token, "secret").unwrap();
        assert_eq!(decoded.user_id, user.id);
        assert_eq!(decoded.role, UserRole::Teacher);
    }

    #[test]
    fn expired_token_is_rejected() {
        let user = sample_user();
        // Issue a token that expired an hour ago (iat = now, exp = now - 3600
        // is not expressible through the ttl parameter, so sign claims directly).
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user.id.to_string(),
            role: UserRole::Teacher,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        let err = decode_access_token(&token, "secret").unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
    }

    #[test]
    fn bad_signature_is_rejected_with_same_error_kind() {
        let user = sample_user();
        let token = AuthService::generate_access_token(&user, "secret", 86400).unwrap();
        let err = decode_access_token(&token, "other-secret").unwrap_err();
        // Indistinguishable from the expired case by design.
        assert!(matches!(err, ApiError::Unauthenticated));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let err = decode_access_token("not.a.jwt", "secret").unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
    }
}
