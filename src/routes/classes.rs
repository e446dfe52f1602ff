use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::ApiError,
    models::{
        auth::AuthenticatedUser,
        class::{Class, CreateClassRequest},
        user::UserRole,
    },
    policy,
    services::classes::ClassService,
    AppState,
};

/// Teachers see their own classes; everyone else sees the institution.
pub async fn list_classes(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Class>>, ApiError> {
    let classes = match user.role {
        UserRole::Teacher => ClassService::list_by_teacher(&state.db, user.user_id).await?,
        _ => ClassService::list_all(&state.db).await?,
    };
    Ok(Json(classes))
}

pub async fn create_class(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateClassRequest>,
) -> Result<(StatusCode, Json<Class>), ApiError> {
    policy::can_manage_classes(user.role).map_err(|d| d.api("Class"))?;
    if body.name.trim().is_empty() {
        return Err(ApiError::Validation("Class name is required".to_string()));
    }
    let class = ClassService::create(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(class)))
}
