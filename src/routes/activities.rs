use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        auth::AuthenticatedUser,
        class::{Activity, CreateActivityRequest},
    },
    policy,
    services::activities::ActivityService,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    #[serde(rename = "classId")]
    pub class_id: Option<Uuid>,
}

pub async fn list_activities(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<Activity>>, ApiError> {
    let activities = match query.class_id {
        Some(class_id) => ActivityService::list_by_class(&state.db, class_id).await?,
        None => ActivityService::list_all(&state.db).await?,
    };
    Ok(Json(activities))
}

pub async fn create_activity(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateActivityRequest>,
) -> Result<(StatusCode, Json<Activity>), ApiError> {
    policy::can_manage_activities(user.role).map_err(|d| d.api("Activity"))?;
    if body.name.trim().is_empty() {
        return Err(ApiError::Validation("Activity name is required".to_string()));
    }
    let activity = ActivityService::create(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}
