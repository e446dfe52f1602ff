use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::milestone::{CreateMilestoneRequest, Milestone, UpdateMilestoneRequest},
    policy::{self, Caller, StudentScope},
};

pub struct MilestoneService;

impl MilestoneService {
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Milestone>, ApiError> {
        let milestone = sqlx::query_as::<_, Milestone>("SELECT * FROM milestones WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(milestone)
    }

    pub async fn list_by_student(pool: &PgPool, student_id: Uuid) -> Result<Vec<Milestone>, ApiError> {
        let milestones = sqlx::query_as::<_, Milestone>(
            "SELECT * FROM milestones WHERE student_id = $1 ORDER BY date DESC",
        )
        .bind(student_id)
        .fetch_all(pool)
        .await?;
        Ok(milestones)
    }

    /// Unfiltered listing narrowed by role: teachers see milestones they
    /// created, parents those of their children, directors and admins all.
    pub async fn list_visible(pool: &PgPool, caller: &Caller) -> Result<Vec<Milestone>, ApiError> {
        let milestones = match policy::student_scope(caller) {
            StudentScope::All => {
                sqlx::query_as::<_, Milestone>("SELECT * FROM milestones ORDER BY date DESC")
                    .fetch_all(pool)
                    .await?
            }
            StudentScope::ChildrenOf(parent_id) => {
                sqlx::query_as::<_, Milestone>(
                    "SELECT m.* FROM milestones m
                     JOIN students s ON s.id = m.student_id
                     WHERE s.parent_id = $1
                     ORDER BY m.date DESC",
                )
                .bind(parent_id)
                .fetch_all(pool)
                .await?
            }
            StudentScope::TaughtBy(teacher_id) => {
                sqlx::query_as::<_, Milestone>(
                    "SELECT * FROM milestones WHERE teacher_id = $1 ORDER BY date DESC",
                )
                .bind(teacher_id)
                .fetch_all(pool)
                .await?
            }
        };
        Ok(milestones)
    }

    pub async fn create(
        pool: &PgPool,
        teacher_id: Uuid,
        req: &CreateMilestoneRequest,
    ) -> Result<Milestone, ApiError> {
        let milestone = sqlx::query_as::<_, Milestone>(
            "INSERT INTO milestones (student_id, title, description, date, category, completed, teacher_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(req.student_id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.date)
        .bind(req.category.to_string())
        .bind(req.completed)
        .bind(teacher_id)
        .fetch_one(pool)
        .await?;
        Ok(milestone)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateMilestoneRequest,
    ) -> Result<Milestone, ApiError> {
        let milestone = sqlx::query_as::<_, Milestone>(
            "UPDATE milestones
             SET title       = COALESCE($1, title),
                 description = COALESCE($2, description),
                 date        = COALESCE($3, date),
                 category    = COALESCE($4, category),
                 completed   = COALESCE($5, completed)
             WHERE id = $6
             RETURNING *",
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.date)
        .bind(req.category.map(|c| c.to_string()))
        .bind(req.completed)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::NotFound("Milestone"))?;
        Ok(milestone)
    }
}
