use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::ApiError,
    middleware::rate_limit::check_rate_limit,
    models::{
        auth::AuthenticatedUser,
        user::{LoginRequest, LoginResponse, RegisterRequest, UserProfile},
    },
    services::auth::AuthService,
    AppState,
};

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // Rate limit: 5 attempts per 15 min per email
    let rate_key = format!("rate:login:{}", body.email.to_lowercase());
    let mut redis = state.redis.clone();
    check_rate_limit(&mut redis, &rate_key, 5, 900).await?;

    let response = AuthService::login(
        &state.db,
        &body.email,
        &body.password,
        &state.config.jwt_secret,
        state.config.jwt_expiry_seconds,
    )
    .await?;
    Ok(Json(response))
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    // Rate limit: 10 registrations per hour per email
    let rate_key = format!("rate:register:{}", body.email.to_lowercase());
    let mut redis = state.redis.clone();
    check_rate_limit(&mut redis, &rate_key, 10, 3600).await?;

    if body.email.trim().is_empty() || !body.email.contains('@') {
        return Err(ApiError::Validation("A valid email is required".to_string()));
    }
    if body.first_name.trim().is_empty() || body.last_name.trim().is_empty() {
        return Err(ApiError::Validation("First and last name are required".to_string()));
    }

    let response = AuthService::register(
        &state.db,
        &body,
        &state.config.jwt_secret,
        state.config.jwt_expiry_seconds,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = AuthService::me(&state.db, user.user_id).await?;
    Ok(Json(profile))
}
