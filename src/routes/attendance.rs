use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        attendance::{
            Attendance, AttendanceQuery, CreateAttendanceRequest, UpdateAttendanceRequest,
        },
        auth::AuthenticatedUser,
    },
    policy::{self, Caller},
    services::{attendance::AttendanceService, students::StudentService},
    AppState,
};

pub async fn list_attendance(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<Vec<Attendance>>, ApiError> {
    let caller = Caller::new(user.user_id, user.role);

    if let Some(student_id) = query.student_id {
        // Per-student history: the entitlement gate decides.
        StudentService::authorize_view(&state.db, &caller, student_id).await?;
        let records = AttendanceService::list_by_student(&state.db, student_id).await?;
        return Ok(Json(records));
    }

    let date = query
        .date
        .ok_or_else(|| ApiError::Validation("date parameter is required".to_string()))?;
    let records = AttendanceService::list_by_date(&state.db, &caller, date, query.class_id).await?;
    Ok(Json(records))
}

pub async fn create_attendance(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateAttendanceRequest>,
) -> Result<(StatusCode, Json<Attendance>), ApiError> {
    policy::can_mark_attendance(user.role).map_err(|d| d.api("Attendance record"))?;
    // The target student must be in the caller's scope.
    let caller = Caller::new(user.user_id, user.role);
    StudentService::authorize_view(&state.db, &caller, body.student_id).await?;

    let record = AttendanceService::create(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_attendance(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAttendanceRequest>,
) -> Result<Json<Attendance>, ApiError> {
    policy::can_mark_attendance(user.role).map_err(|d| d.api("Attendance record"))?;

    let existing = AttendanceService::get(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Attendance record"))?;
    let caller = Caller::new(user.user_id, user.role);
    StudentService::authorize_view(&state.db, &caller, existing.student_id).await?;

    let record = AttendanceService::update(&state.db, id, &body).await?;
    Ok(Json(record))
}
