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
        report::{CreateReportRequest, Report, ReportQuery, UpdateReportRequest},
    },
    policy::{self, Caller},
    services::{reports::ReportService, students::StudentService},
    AppState,
};

pub async fn list_reports(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<Report>>, ApiError> {
    let caller = Caller::new(user.user_id, user.role);

    let reports = match query.student_id {
        Some(student_id) => {
            StudentService::authorize_view(&state.db, &caller, student_id).await?;
            ReportService::list_by_student(&state.db, student_id).await?
        }
        None => ReportService::list_visible(&state.db, &caller).await?,
    };
    Ok(Json(reports))
}

pub async fn get_report(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Report>, ApiError> {
    let report = ReportService::get(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Report"))?;

    // Entitlement runs through the student; denial masks existence.
    let caller = Caller::new(user.user_id, user.role);
    StudentService::authorize_view(&state.db, &caller, report.student_id)
        .await
        .map_err(|_| ApiError::NotFound("Report"))?;
    Ok(Json(report))
}

pub async fn create_report(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<Report>), ApiError> {
    policy::can_author_reports(user.role).map_err(|d| d.api("Report"))?;
    let caller = Caller::new(user.user_id, user.role);
    StudentService::authorize_view(&state.db, &caller, body.student_id).await?;

    let report = ReportService::create(&state.db, user.user_id, &body).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn update_report(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateReportRequest>,
) -> Result<Json<Report>, ApiError> {
    let report = ReportService::get(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Report"))?;

    let caller = Caller::new(user.user_id, user.role);
    policy::can_update_report(&caller, report.teacher_id).map_err(|d| d.api("Report"))?;

    let updated = ReportService::update(&state.db, id, &body).await?;
    Ok(Json(updated))
}
