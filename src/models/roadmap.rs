use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Cognitive,
    Physical,
    Social,
    Emotional,
    Language,
    Creativity,
}

impl std::fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SkillCategory::Cognitive => "cognitive",
            SkillCategory::Physical => "physical",
            SkillCategory::Social => "social",
            SkillCategory::Emotional => "emotional",
            SkillCategory::Language => "language",
            SkillCategory::Creativity => "creativity",
        };
        write!(f, "{s}")
    }
}

/// Stage progression states. `completed` triggers the current-stage advance
/// on the owning roadmap; `needs_review` is a side channel that does not.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    NotStarted,
    InProgress,
    Completed,
    NeedsReview,
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StageStatus::NotStarted => "not_started",
            StageStatus::InProgress => "in_progress",
            StageStatus::Completed => "completed",
            StageStatus::NeedsReview => "needs_review",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapTemplate {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub age_group: String,
    pub created_by: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// DB row struct — skill_category is stored as TEXT.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapStage {
    pub id: Uuid,
    pub template_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// 1-based position within the template; the completion side effect
    /// advances roadmaps along this ordering.
    pub stage_order: i32,
    pub expected_duration_days: Option<i32>,
    pub skill_category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StudentRoadmap {
    pub id: Uuid,
    pub student_id: Uuid,
    pub template_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub current_stage_id: Option<Uuid>,
    pub teacher_notes: Option<String>,
    pub last_updated: DateTime<Utc>,
}

/// DB row struct — status is stored as TEXT.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StageProgress {
    pub id: Uuid,
    pub student_roadmap_id: Uuid,
    pub stage_id: Uuid,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub teacher_feedback: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    pub name: String,
    pub description: Option<String>,
    pub age_group: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStageRequest {
    pub template_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub stage_order: i32,
    pub expected_duration_days: Option<i32>,
    pub skill_category: SkillCategory,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoadmapRequest {
    pub student_id: Uuid,
    pub template_id: Uuid,
    pub teacher_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertStageProgressRequest {
    pub student_roadmap_id: Uuid,
    pub stage_id: Uuid,
    pub status: StageStatus,
    pub teacher_feedback: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StudentRoadmapQuery {
    #[serde(rename = "studentId")]
    pub student_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct StageProgressQuery {
    #[serde(rename = "studentRoadmapId")]
    pub student_roadmap_id: Uuid,
}
