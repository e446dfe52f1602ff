use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        auth::AuthenticatedUser,
        milestone::{CreateMilestoneRequest, Milestone, MilestoneQuery, UpdateMilestoneRequest},
    },
    policy::{self, Caller},
    services::{milestones::MilestoneService, students::StudentService},
    AppState,
};

pub async fn list_milestones(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<MilestoneQuery>,
) -> Result<Json<Vec<Milestone>>, ApiError> {
    let caller = Caller::new(user.user_id, user.role);

    let milestones = match query.student_id {
        Some(student_id) => {
            StudentService::authorize_view(&state.db, &caller, student_id).await?;
            MilestoneService::list_by_student(&state.db, student_id).await?
        }
        None => MilestoneService::list_visible(&state.db, &caller).await?,
    };
    Ok(Json(milestones))
}

pub async fn get_milestone(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Milestone>, ApiError> {
    let milestone = MilestoneService::get(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Milestone"))?;

    let caller = Caller::new(user.user_id, user.role);
    StudentService::authorize_view(&state.db, &caller, milestone.student_id)
        .await
        .map_err(|_| ApiError::NotFound("Milestone"))?;
    Ok(Json(milestone))
}

pub async fn create_milestone(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateMilestoneRequest>,
) -> Result<(StatusCode, Json<Milestone>), ApiError> {
    policy::can_manage_milestones(user.role).map_err(|d| d.api("Milestone"))?;
    let caller = Caller::new(user.user_id, user.role);
    StudentService::authorize_view(&state.db, &caller, body.student_id).await?;

    let milestone = MilestoneService::create(&state.db, user.user_id, &body).await?;
    Ok((StatusCode::CREATED, Json(milestone)))
}

pub async fn update_milestone(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMilestoneRequest>,
) -> Result<Json<Milestone>, ApiError> {
    let milestone = MilestoneService::get(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Milestone"))?;

    let caller = Caller::new(user.user_id, user.role);
    policy::can_update_milestone(&caller, milestone.teacher_id).map_err(|d| d.api("Milestone"))?;

    let updated = MilestoneService::update(&state.db, id, &body).await?;
    Ok(Json(updated))
}
