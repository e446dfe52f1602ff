use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneCategory {
    Academic,
    Behavioral,
    Physical,
    Social,
    Creative,
}

impl std::fmt::Display for MilestoneCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MilestoneCategory::Academic => "academic",
            MilestoneCategory::Behavioral => "behavioral",
            MilestoneCategory::Physical => "physical",
            MilestoneCategory::Social => "social",
            MilestoneCategory::Creative => "creative",
        };
        write!(f, "{s}")
    }
}

/// DB row struct — category is stored as TEXT.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: Uuid,
    pub student_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub category: String,
    pub completed: bool,
    pub teacher_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMilestoneRequest {
    pub student_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub category: MilestoneCategory,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMilestoneRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub category: Option<MilestoneCategory>,
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct MilestoneQuery {
    #[serde(rename = "studentId")]
    pub student_id: Option<Uuid>,
}
