use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::roadmap::{
        AssignRoadmapRequest, CreateStageRequest, CreateTemplateRequest, RoadmapStage,
        RoadmapTemplate, StageProgress, StageStatus, StudentRoadmap, UpsertStageProgressRequest,
    },
};

/// The stage a roadmap should point at after `completed_order` finishes:
/// the next stage in template order, or `None` when the completed stage was
/// the last one (the pointer is then left unchanged).
pub fn next_stage(stages: &[RoadmapStage], completed_order: i32) -> Option<&RoadmapStage> {
    stages.iter().find(|s| s.stage_order == completed_order + 1)
}

pub struct RoadmapService;

impl RoadmapService {
    pub async fn list_templates(pool: &PgPool) -> Result<Vec<RoadmapTemplate>, ApiError> {
        let templates = sqlx::query_as::<_, RoadmapTemplate>(
            "SELECT * FROM roadmap_templates WHERE is_active = TRUE ORDER BY name",
        )
        .fetch_all(pool)
        .await?;
        Ok(templates)
    }

    pub async fn create_template(
        pool: &PgPool,
        created_by: Uuid,
        req: &CreateTemplateRequest,
    ) -> Result<RoadmapTemplate, ApiError> {
        let template = sqlx::query_as::<_, RoadmapTemplate>(
            "INSERT INTO roadmap_templates (name, description, age_group, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.age_group)
        .bind(created_by)
        .fetch_one(pool)
        .await?;
        Ok(template)
    }

    pub async fn stages_for_template(
        pool: &PgPool,
        template_id: Uuid,
    ) -> Result<Vec<RoadmapStage>, ApiError> {
        let stages = sqlx::query_as::<_, RoadmapStage>(
            "SELECT * FROM roadmap_stages WHERE template_id = $1 ORDER BY stage_order",
        )
        .bind(template_id)
        .fetch_all(pool)
        .await?;
        Ok(stages)
    }

    pub async fn create_stage(pool: &PgPool, req: &CreateStageRequest) -> Result<RoadmapStage, ApiError> {
        if req.stage_order < 1 {
            return Err(ApiError::Validation("stage_order must be >= 1".to_string()));
        }
        let stage = sqlx::query_as::<_, RoadmapStage>(
            "INSERT INTO roadmap_stages
                 (template_id, title, description, stage_order, expected_duration_days, skill_category)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(req.template_id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.stage_order)
        .bind(req.expected_duration_days)
        .bind(req.skill_category.to_string())
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => ApiError::Conflict(
                "A stage with this order already exists in the template".to_string(),
            ),
            other => other.into(),
        })?;
        Ok(stage)
    }

    /// Assign a template to a student. The roadmap starts at the template's
    /// first stage.
    pub async fn assign(pool: &PgPool, req: &AssignRoadmapRequest) -> Result<StudentRoadmap, ApiError> {
        let first_stage: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM roadmap_stages WHERE template_id = $1 ORDER BY stage_order LIMIT 1",
        )
        .bind(req.template_id)
        .fetch_optional(pool)
        .await?;

        let roadmap = sqlx::query_as::<_, StudentRoadmap>(
            "INSERT INTO student_roadmaps (student_id, template_id, current_stage_id, teacher_notes)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(req.student_id)
        .bind(req.template_id)
        .bind(first_stage)
        .bind(&req.teacher_notes)
        .fetch_one(pool)
        .await?;
        Ok(roadmap)
    }

    pub async fn roadmaps_for_student(
        pool: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<StudentRoadmap>, ApiError> {
        let roadmaps = sqlx::query_as::<_, StudentRoadmap>(
            "SELECT * FROM student_roadmaps WHERE student_id = $1 ORDER BY start_date DESC",
        )
        .bind(student_id)
        .fetch_all(pool)
        .await?;
        Ok(roadmaps)
    }

    pub async fn get_roadmap(pool: &PgPool, id: Uuid) -> Result<Option<StudentRoadmap>, ApiError> {
        let roadmap =
            sqlx::query_as::<_, StudentRoadmap>("SELECT * FROM student_roadmaps WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(roadmap)
    }

    pub async fn progress_for_roadmap(
        pool: &PgPool,
        student_roadmap_id: Uuid,
    ) -> Result<Vec<StageProgress>, ApiError> {
        let entries = sqlx::query_as::<_, StageProgress>(
            "SELECT p.* FROM stage_progress p
             JOIN roadmap_stages st ON st.id = p.stage_id
             WHERE p.student_roadmap_id = $1
             ORDER BY st.stage_order",
        )
        .bind(student_roadmap_id)
        .fetch_all(pool)
        .await?;
        Ok(entries)
    }

    /// Upsert progress for (roadmap, stage). Marking a stage `completed`
    /// also advances the roadmap's current-stage pointer to the next stage
    /// in template order, if any. Both writes happen in one transaction with
    /// the roadmap row locked: racing completions cannot skip a stage, and
    /// the caller observes both effects or neither.
    pub async fn upsert_progress(
        pool: &PgPool,
        req: &UpsertStageProgressRequest,
    ) -> Result<StageProgress, ApiError> {
        let mut tx = pool.begin().await?;

        // Lock the roadmap for the duration of the update.
        let roadmap = sqlx::query_as::<_, StudentRoadmap>(
            "SELECT * FROM student_roadmaps WHERE id = $1 FOR UPDATE",
        )
        .bind(req.student_roadmap_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ApiError::NotFound("Student roadmap"))?;

        let stage = sqlx::query_as::<_, RoadmapStage>("SELECT * FROM roadmap_stages WHERE id = $1")
            .bind(req.stage_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ApiError::NotFound("Roadmap stage"))?;
        if stage.template_id != roadmap.template_id {
            return Err(ApiError::Validation(
                "Stage does not belong to the roadmap's template".to_string(),
            ));
        }

        let now = Utc::now();
        let started_at = match req.status {
            StageStatus::NotStarted => None,
            _ => Some(now),
        };
        let completed_at = match req.status {
            StageStatus::Completed => Some(now),
            _ => None,
        };

        let progress = sqlx::query_as::<_, StageProgress>(
            "INSERT INTO stage_progress
                 (student_roadmap_id, stage_id, status, started_at, completed_at, teacher_feedback)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (student_roadmap_id, stage_id) DO UPDATE SET
                 status           = EXCLUDED.status,
                 started_at       = COALESCE(stage_progress.started_at, EXCLUDED.started_at),
                 completed_at     = EXCLUDED.completed_at,
                 teacher_feedback = COALESCE(EXCLUDED.teacher_feedback, stage_progress.teacher_feedback)
             RETURNING *",
        )
        .bind(req.student_roadmap_id)
        .bind(req.stage_id)
        .bind(req.status.to_string())
        .bind(started_at)
        .bind(completed_at)
        .bind(&req.teacher_feedback)
        .fetch_one(&mut *tx)
        .await?;

        if req.status == StageStatus::Completed {
            let stages = sqlx::query_as::<_, RoadmapStage>(
                "SELECT * FROM roadmap_stages WHERE template_id = $1 ORDER BY stage_order",
            )
            .bind(roadmap.template_id)
            .fetch_all(&mut *tx)
            .await?;

            // Last stage completed: no next stage, pointer stays put.
            if let Some(next) = next_stage(&stages, stage.stage_order) {
                sqlx::query(
                    "UPDATE student_roadmaps SET current_stage_id = $1, last_updated = NOW()
                     WHERE id = $2",
                )
                .bind(next.id)
                .bind(roadmap.id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(order: i32) -> RoadmapStage {
        RoadmapStage {
            id: Uuid::new_v4(),
            template_id: Uuid::new_v4(),
            title: format!("Stage {order}"),
            description: None,
            stage_order: order,
            expected_duration_days: None,
            skill_category: "cognitive".into(),
        }
    }

    #[test]
    fn advances_to_the_next_stage_in_order() {
        let stages = vec![stage(1), stage(2), stage(3)];
        let next = next_stage(&stages, 1).unwrap();
        assert_eq!(next.stage_order, 2);
    }

    #[test]
    fn completing_the_last_stage_yields_no_next() {
        let stages = vec![stage(1), stage(2), stage(3)];
        assert!(next_stage(&stages, 3).is_none());
    }

    #[test]
    fn gaps_in_ordering_do_not_skip_ahead() {
        // Orders 1 and 3 exist; completing 1 must not jump to 3.
        let stages = vec![stage(1), stage(3)];
        assert!(next_stage(&stages, 1).is_none());
    }
}
