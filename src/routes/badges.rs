use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        auth::AuthenticatedUser,
        badge::{
            AwardBadgeRequest, Badge, BadgeQuery, CreateBadgeRequest, StudentBadge,
            StudentBadgeQuery, StudentBadgeWithDetails,
        },
    },
    policy::{self, Caller},
    services::{badges::BadgeService, students::StudentService},
    AppState,
};

/// The badge catalogue is not student data; any authenticated user may browse it.
pub async fn list_badges(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Query(query): Query<BadgeQuery>,
) -> Result<Json<Vec<Badge>>, ApiError> {
    let badges = BadgeService::list(&state.db, query.category).await?;
    Ok(Json(badges))
}

pub async fn get_badge(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Badge>, ApiError> {
    let badge = BadgeService::get(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Badge"))?;
    Ok(Json(badge))
}

pub async fn create_badge(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateBadgeRequest>,
) -> Result<(StatusCode, Json<Badge>), ApiError> {
    policy::can_create_badges(user.role).map_err(|d| d.api("Badge"))?;
    if body.name.trim().is_empty() {
        return Err(ApiError::Validation("Badge name is required".to_string()));
    }
    let badge = BadgeService::create(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(badge)))
}

pub async fn list_student_badges(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<StudentBadgeQuery>,
) -> Result<Json<Vec<StudentBadgeWithDetails>>, ApiError> {
    let caller = Caller::new(user.user_id, user.role);
    StudentService::authorize_view(&state.db, &caller, query.student_id).await?;

    let awards = BadgeService::awards_for_student(&state.db, query.student_id).await?;
    Ok(Json(awards))
}

pub async fn award_student_badge(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<AwardBadgeRequest>,
) -> Result<(StatusCode, Json<StudentBadge>), ApiError> {
    policy::can_award_badges(user.role).map_err(|d| d.api("Badge"))?;
    let caller = Caller::new(user.user_id, user.role);
    StudentService::authorize_view(&state.db, &caller, body.student_id).await?;

    let today = Utc::now().date_naive();
    let award = BadgeService::award(&state.db, user.user_id, &body, today).await?;
    Ok((StatusCode::CREATED, Json(award)))
}
