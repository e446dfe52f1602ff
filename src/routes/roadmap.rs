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
        roadmap::{
            AssignRoadmapRequest, CreateStageRequest, CreateTemplateRequest, RoadmapStage,
            RoadmapTemplate, StageProgress, StageProgressQuery, StudentRoadmap,
            StudentRoadmapQuery, UpsertStageProgressRequest,
        },
    },
    policy::{self, Caller},
    services::{roadmap::RoadmapService, students::StudentService},
    AppState,
};

pub async fn list_templates(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<RoadmapTemplate>>, ApiError> {
    let templates = RoadmapService::list_templates(&state.db).await?;
    Ok(Json(templates))
}

pub async fn create_template(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<RoadmapTemplate>), ApiError> {
    policy::can_manage_roadmaps(user.role).map_err(|d| d.api("Roadmap template"))?;
    if body.name.trim().is_empty() {
        return Err(ApiError::Validation("Template name is required".to_string()));
    }
    let template = RoadmapService::create_template(&state.db, user.user_id, &body).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn list_template_stages(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(template_id): Path<Uuid>,
) -> Result<Json<Vec<RoadmapStage>>, ApiError> {
    let stages = RoadmapService::stages_for_template(&state.db, template_id).await?;
    Ok(Json(stages))
}

pub async fn create_stage(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateStageRequest>,
) -> Result<(StatusCode, Json<RoadmapStage>), ApiError> {
    policy::can_manage_roadmaps(user.role).map_err(|d| d.api("Roadmap stage"))?;
    let stage = RoadmapService::create_stage(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(stage)))
}

pub async fn assign_roadmap(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<AssignRoadmapRequest>,
) -> Result<(StatusCode, Json<StudentRoadmap>), ApiError> {
    policy::can_manage_roadmaps(user.role).map_err(|d| d.api("Student roadmap"))?;
    let caller = Caller::new(user.user_id, user.role);
    StudentService::authorize_view(&state.db, &caller, body.student_id).await?;

    let roadmap = RoadmapService::assign(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(roadmap)))
}

pub async fn list_student_roadmaps(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<StudentRoadmapQuery>,
) -> Result<Json<Vec<StudentRoadmap>>, ApiError> {
    let caller = Caller::new(user.user_id, user.role);
    StudentService::authorize_view(&state.db, &caller, query.student_id).await?;

    let roadmaps = RoadmapService::roadmaps_for_student(&state.db, query.student_id).await?;
    Ok(Json(roadmaps))
}

pub async fn list_stage_progress(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<StageProgressQuery>,
) -> Result<Json<Vec<StageProgress>>, ApiError> {
    // Entitlement runs through the roadmap's student; an unentitled caller
    // sees the same 404 as for a missing roadmap.
    let roadmap = RoadmapService::get_roadmap(&state.db, query.student_roadmap_id)
        .await?
        .ok_or(ApiError::NotFound("Student roadmap"))?;
    let caller = Caller::new(user.user_id, user.role);
    StudentService::authorize_view(&state.db, &caller, roadmap.student_id)
        .await
        .map_err(|_| ApiError::NotFound("Student roadmap"))?;

    let entries = RoadmapService::progress_for_roadmap(&state.db, roadmap.id).await?;
    Ok(Json(entries))
}

pub async fn upsert_stage_progress(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<UpsertStageProgressRequest>,
) -> Result<Json<StageProgress>, ApiError> {
    policy::can_manage_roadmaps(user.role).map_err(|d| d.api("Stage progress"))?;

    let roadmap = RoadmapService::get_roadmap(&state.db, body.student_roadmap_id)
        .await?
        .ok_or(ApiError::NotFound("Student roadmap"))?;
    let caller = Caller::new(user.user_id, user.role);
    StudentService::authorize_view(&state.db, &caller, roadmap.student_id).await?;

    let progress = RoadmapService::upsert_progress(&state.db, &body).await?;
    Ok(Json(progress))
}
