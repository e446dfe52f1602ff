use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        auth::AuthenticatedUser,
        student::{CreateStudentRequest, Student, UpdateStudentRequest},
    },
    policy::{self, Caller},
    services::students::StudentService,
    AppState,
};

pub async fn list_students(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Student>>, ApiError> {
    let caller = Caller::new(user.user_id, user.role);
    let students = StudentService::list_visible(&state.db, &caller).await?;
    Ok(Json(students))
}

pub async fn get_student(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Student>, ApiError> {
    let caller = Caller::new(user.user_id, user.role);
    let student = StudentService::authorize_view(&state.db, &caller, id).await?;
    Ok(Json(student))
}

pub async fn create_student(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<Student>), ApiError> {
    policy::can_manage_students(user.role).map_err(|d| d.api("Student"))?;
    let student = StudentService::create(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn update_student(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStudentRequest>,
) -> Result<Json<Student>, ApiError> {
    policy::can_manage_students(user.role).map_err(|d| d.api("Student"))?;
    // Teachers may only touch students they can see.
    let caller = Caller::new(user.user_id, user.role);
    StudentService::authorize_view(&state.db, &caller, id).await?;
    let student = StudentService::update(&state.db, id, &body).await?;
    Ok(Json(student))
}

pub async fn delete_student(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    policy::can_manage_students(user.role).map_err(|d| d.api("Student"))?;
    let caller = Caller::new(user.user_id, user.role);
    StudentService::authorize_view(&state.db, &caller, id).await?;
    StudentService::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "Student deleted" })))
}
