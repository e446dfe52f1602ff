use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::ApiError,
    models::{
        auth::AuthenticatedUser,
        user::{CreateUserRequest, UserProfile},
    },
    policy,
    services::{
        stats::{AdminStats, StatsService},
        users::UserService,
    },
    AppState,
};

pub async fn admin_stats(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<AdminStats>, ApiError> {
    policy::can_view_admin(user.role).map_err(|d| d.api("Stats"))?;
    let stats = StatsService::admin_stats(&state.db).await?;
    Ok(Json(stats))
}

pub async fn list_users(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<UserProfile>>, ApiError> {
    policy::can_view_admin(user.role).map_err(|d| d.api("Users"))?;
    let users = UserService::list_all(&state.db).await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}

pub async fn create_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    policy::can_create_admin_users(user.role).map_err(|d| d.api("User"))?;

    if body.email.trim().is_empty() || !body.email.contains('@') {
        return Err(ApiError::Validation("A valid email is required".to_string()));
    }
    if body.password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if UserService::get_by_email(&state.db, &body.email).await?.is_some() {
        return Err(ApiError::Validation("Email already registered".to_string()));
    }

    let profile_image = body.profile_image.clone().unwrap_or_else(|| {
        format!(
            "https://ui-avatars.com/api/?name={}+{}",
            body.first_name, body.last_name
        )
    });
    let created = UserService::create(
        &state.db,
        &body.first_name,
        &body.last_name,
        &body.email,
        &body.password,
        body.role,
        Some(&profile_image),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}
