use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    Academic,
    Behavioral,
    Attendance,
    Special,
}

impl std::fmt::Display for BadgeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BadgeCategory::Academic => "academic",
            BadgeCategory::Behavioral => "behavioral",
            BadgeCategory::Attendance => "attendance",
            BadgeCategory::Special => "special",
        };
        write!(f, "{s}")
    }
}

/// Badge template; not tied to any student until awarded.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Badge {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateBadgeRequest {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: BadgeCategory,
}

/// Award record linking a badge to a student.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StudentBadge {
    pub id: Uuid,
    pub student_id: Uuid,
    pub badge_id: Uuid,
    pub date_awarded: NaiveDate,
    pub awarded_by: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardBadgeRequest {
    pub student_id: Uuid,
    pub badge_id: Uuid,
    pub date_awarded: Option<NaiveDate>,
}

/// Award joined with its badge details, as returned by the listing endpoint.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StudentBadgeWithDetails {
    pub id: Uuid,
    pub student_id: Uuid,
    pub badge_id: Uuid,
    pub date_awarded: NaiveDate,
    pub awarded_by: Uuid,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct BadgeQuery {
    pub category: Option<BadgeCategory>,
}

#[derive(Debug, Deserialize)]
pub struct StudentBadgeQuery {
    #[serde(rename = "studentId")]
    pub student_id: Uuid,
}
