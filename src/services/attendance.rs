use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::attendance::{Attendance, CreateAttendanceRequest, UpdateAttendanceRequest},
    policy::{self, Caller, StudentScope},
};

pub struct AttendanceService;

impl AttendanceService {
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Attendance>, ApiError> {
        let record = sqlx::query_as::<_, Attendance>("SELECT * FROM attendances WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(record)
    }

    pub async fn list_by_student(pool: &PgPool, student_id: Uuid) -> Result<Vec<Attendance>, ApiError> {
        let records = sqlx::query_as::<_, Attendance>(
            "SELECT * FROM attendances WHERE student_id = $1 ORDER BY date DESC",
        )
        .bind(student_id)
        .fetch_all(pool)
        .await?;
        Ok(records)
    }

    /// Records for one day, narrowed to the caller's entitled students and
    /// optionally to one class.
    pub async fn list_by_date(
        pool: &PgPool,
        caller: &Caller,
        date: NaiveDate,
        class_id: Option<Uuid>,
    ) -> Result<Vec<Attendance>, ApiError> {
        let records = match policy::student_scope(caller) {
            StudentScope::All => {
                sqlx::query_as::<_, Attendance>(
                    "SELECT a.* FROM attendances a
                     JOIN students s ON s.id = a.student_id
                     WHERE a.date = $1 AND ($2::uuid IS NULL OR s.class_id = $2)
                     ORDER BY a.student_id",
                )
                .bind(date)
                .bind(class_id)
                .fetch_all(pool)
                .await?
            }
            StudentScope::ChildrenOf(parent_id) => {
                sqlx::query_as::<_, Attendance>(
                    "SELECT a.* FROM attendances a
                     JOIN students s ON s.id = a.student_id
                     WHERE a.date = $1 AND s.parent_id = $2
                       AND ($3::uuid IS NULL OR s.class_id = $3)
                     ORDER BY a.student_id",
                )
                .bind(date)
                .bind(parent_id)
                .bind(class_id)
                .fetch_all(pool)
                .await?
            }
            StudentScope::TaughtBy(teacher_id) => {
                sqlx::query_as::<_, Attendance>(
                    "SELECT a.* FROM attendances a
                     JOIN students s ON s.id = a.student_id
                     JOIN classes c ON c.id = s.class_id
                     WHERE a.date = $1 AND c.teacher_id = $2
                       AND ($3::uuid IS NULL OR s.class_id = $3)
                     ORDER BY a.student_id",
                )
                .bind(date)
                .bind(teacher_id)
                .bind(class_id)
                .fetch_all(pool)
                .await?
            }
        };
        Ok(records)
    }

    /// At most one record per (student, date). Pre-checked for a clean 409;
    /// the unique index catches the concurrent-create race and maps to the
    /// same 409.
    pub async fn create(pool: &PgPool, req: &CreateAttendanceRequest) -> Result<Attendance, ApiError> {
        let existing: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM attendances WHERE student_id = $1 AND date = $2",
        )
        .bind(req.student_id)
        .bind(req.date)
        .fetch_optional(pool)
        .await?;
        if existing.is_some() {
            return Err(ApiError::Conflict(
                "Attendance already recorded for this student and date".to_string(),
            ));
        }

        let record = sqlx::query_as::<_, Attendance>(
            "INSERT INTO attendances (student_id, date, status, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(req.student_id)
        .bind(req.date)
        .bind(req.status.to_string())
        .bind(&req.notes)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => ApiError::Conflict(
                "Attendance already recorded for this student and date".to_string(),
            ),
            other => other.into(),
        })?;
        Ok(record)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateAttendanceRequest,
    ) -> Result<Attendance, ApiError> {
        let record = sqlx::query_as::<_, Attendance>(
            "UPDATE attendances
             SET status = COALESCE($1, status),
                 notes  = COALESCE($2, notes)
             WHERE id = $3
             RETURNING *",
        )
        .bind(req.status.map(|s| s.to_string()))
        .bind(&req.notes)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::NotFound("Attendance record"))?;
        Ok(record)
    }
}
