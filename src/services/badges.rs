use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::badge::{
        AwardBadgeRequest, Badge, BadgeCategory, CreateBadgeRequest, StudentBadge,
        StudentBadgeWithDetails,
    },
};

pub struct BadgeService;

impl BadgeService {
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Badge>, ApiError> {
        let badge = sqlx::query_as::<_, Badge>("SELECT * FROM badges WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(badge)
    }

    pub async fn list(
        pool: &PgPool,
        category: Option<BadgeCategory>,
    ) -> Result<Vec<Badge>, ApiError> {
        let badges = sqlx::query_as::<_, Badge>(
            "SELECT * FROM badges WHERE ($1::text IS NULL OR category = $1) ORDER BY name",
        )
        .bind(category.map(|c| c.to_string()))
        .fetch_all(pool)
        .await?;
        Ok(badges)
    }

    pub async fn create(pool: &PgPool, req: &CreateBadgeRequest) -> Result<Badge, ApiError> {
        let badge = sqlx::query_as::<_, Badge>(
            "INSERT INTO badges (name, description, icon, category)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.icon)
        .bind(req.category.to_string())
        .fetch_one(pool)
        .await?;
        Ok(badge)
    }

    /// Awards joined with badge details, most recent first.
    pub async fn awards_for_student(
        pool: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<StudentBadgeWithDetails>, ApiError> {
        let awards = sqlx::query_as::<_, StudentBadgeWithDetails>(
            "SELECT sb.id, sb.student_id, sb.badge_id, sb.date_awarded, sb.awarded_by,
                    b.name, b.description, b.icon, b.category
             FROM student_badges sb
             JOIN badges b ON b.id = sb.badge_id
             WHERE sb.student_id = $1
             ORDER BY sb.date_awarded DESC",
        )
        .bind(student_id)
        .fetch_all(pool)
        .await?;
        Ok(awards)
    }

    /// A badge goes to a student at most once; a duplicate award is a 409.
    pub async fn award(
        pool: &PgPool,
        awarded_by: Uuid,
        req: &AwardBadgeRequest,
        today: NaiveDate,
    ) -> Result<StudentBadge, ApiError> {
        if Self::get(pool, req.badge_id).await?.is_none() {
            return Err(ApiError::NotFound("Badge"));
        }

        let existing: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM student_badges WHERE student_id = $1 AND badge_id = $2",
        )
        .bind(req.student_id)
        .bind(req.badge_id)
        .fetch_optional(pool)
        .await?;
        if existing.is_some() {
            return Err(ApiError::Conflict(
                "Badge already awarded to this student".to_string(),
            ));
        }

        let award = sqlx::query_as::<_, StudentBadge>(
            "INSERT INTO student_badges (student_id, badge_id, date_awarded, awarded_by)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(req.student_id)
        .bind(req.badge_id)
        .bind(req.date_awarded.unwrap_or(today))
        .bind(awarded_by)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                ApiError::Conflict("Badge already awarded to this student".to_string())
            }
            other => other.into(),
        })?;
        Ok(award)
    }
}
