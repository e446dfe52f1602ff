use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::report::{CreateReportRequest, Report, UpdateReportRequest},
    policy::{self, Caller, StudentScope},
};

pub struct ReportService;

impl ReportService {
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Report>, ApiError> {
        let report = sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(report)
    }

    pub async fn list_by_student(pool: &PgPool, student_id: Uuid) -> Result<Vec<Report>, ApiError> {
        let reports = sqlx::query_as::<_, Report>(
            "SELECT * FROM reports WHERE student_id = $1 ORDER BY date DESC",
        )
        .bind(student_id)
        .fetch_all(pool)
        .await?;
        Ok(reports)
    }

    /// Unfiltered listing, narrowed to the caller's entitled students.
    /// Teachers additionally see only reports they authored, matching the
    /// authoring model.
    pub async fn list_visible(pool: &PgPool, caller: &Caller) -> Result<Vec<Report>, ApiError> {
        let reports = match policy::student_scope(caller) {
            StudentScope::All => {
                sqlx::query_as::<_, Report>("SELECT * FROM reports ORDER BY date DESC")
                    .fetch_all(pool)
                    .await?
            }
            StudentScope::ChildrenOf(parent_id) => {
                sqlx::query_as::<_, Report>(
                    "SELECT r.* FROM reports r
                     JOIN students s ON s.id = r.student_id
                     WHERE s.parent_id = $1
                     ORDER BY r.date DESC",
                )
                .bind(parent_id)
                .fetch_all(pool)
                .await?
            }
            StudentScope::TaughtBy(teacher_id) => {
                sqlx::query_as::<_, Report>(
                    "SELECT * FROM reports WHERE teacher_id = $1 ORDER BY date DESC",
                )
                .bind(teacher_id)
                .fetch_all(pool)
                .await?
            }
        };
        Ok(reports)
    }

    /// At most one report per (student, date); same pre-check plus
    /// unique-index backstop as attendance.
    pub async fn create(
        pool: &PgPool,
        teacher_id: Uuid,
        req: &CreateReportRequest,
    ) -> Result<Report, ApiError> {
        let existing: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM reports WHERE student_id = $1 AND date = $2")
                .bind(req.student_id)
                .bind(req.date)
                .fetch_optional(pool)
                .await?;
        if existing.is_some() {
            return Err(ApiError::Conflict(
                "A report already exists for this student and date".to_string(),
            ));
        }

        let report = sqlx::query_as::<_, Report>(
            "INSERT INTO reports (student_id, teacher_id, date, mood, activities, notes, achievements)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(req.student_id)
        .bind(teacher_id)
        .bind(req.date)
        .bind(req.mood.to_string())
        .bind(&req.activities)
        .bind(&req.notes)
        .bind(&req.achievements)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => ApiError::Conflict(
                "A report already exists for this student and date".to_string(),
            ),
            other => other.into(),
        })?;
        Ok(report)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateReportRequest,
    ) -> Result<Report, ApiError> {
        let report = sqlx::query_as::<_, Report>(
            "UPDATE reports
             SET mood         = COALESCE($1, mood),
                 activities   = COALESCE($2, activities),
                 notes        = COALESCE($3, notes),
                 achievements = COALESCE($4, achievements)
             WHERE id = $5
             RETURNING *",
        )
        .bind(req.mood.map(|m| m.to_string()))
        .bind(&req.activities)
        .bind(&req.notes)
        .bind(&req.achievements)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::NotFound("Report"))?;
        Ok(report)
    }
}
