use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::user::{User, UserRole},
};

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, role, \
     profile_image, theme, last_active, created_at, updated_at";

pub struct UserService;

impl UserService {
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    /// Email lookup is case-insensitive, matching the unique index.
    pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    pub async fn create(
        pool: &PgPool,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        role: UserRole,
        profile_image: Option<&str>,
    ) -> Result<User, ApiError> {
        let password_hash = bcrypt::hash(password, 12)?;
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (first_name, last_name, email, password_hash, role, profile_image)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(&password_hash)
        .bind(role.to_string())
        .bind(profile_image)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            // Concurrent registration with the same email hits the unique index.
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                ApiError::Validation("Email already registered".to_string())
            }
            other => other.into(),
        })?;
        Ok(user)
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, ApiError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY role, last_name, first_name"
        ))
        .fetch_all(pool)
        .await?;
        Ok(users)
    }
}
