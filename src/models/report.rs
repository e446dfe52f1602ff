use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// How the student's day went, from best to worst.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Amazing,
    Happy,
    Okay,
    Sad,
    Upset,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Amazing, Mood::Happy, Mood::Okay, Mood::Sad, Mood::Upset];
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Mood::Amazing => "amazing",
            Mood::Happy => "happy",
            Mood::Okay => "okay",
            Mood::Sad => "sad",
            Mood::Upset => "upset",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Mood {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "amazing" => Ok(Mood::Amazing),
            "happy" => Ok(Mood::Happy),
            "okay" => Ok(Mood::Okay),
            "sad" => Ok(Mood::Sad),
            "upset" => Ok(Mood::Upset),
            _ => Err(anyhow::anyhow!("Unknown mood: {s}")),
        }
    }
}

/// DB row struct — mood is stored as TEXT, list fields as TEXT[].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub student_id: Uuid,
    pub teacher_id: Uuid,
    pub date: NaiveDate,
    pub mood: String,
    pub activities: Vec<String>,
    pub notes: Option<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub student_id: Uuid,
    pub date: NaiveDate,
    pub mood: Mood,
    #[serde(default)]
    pub activities: Vec<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReportRequest {
    pub mood: Option<Mood>,
    pub activities: Option<Vec<String>>,
    pub notes: Option<String>,
    pub achievements: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(rename = "studentId")]
    pub student_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_round_trips_through_str() {
        for mood in Mood::ALL {
            let parsed: Mood = mood.to_string().parse().unwrap();
            assert_eq!(parsed, mood);
        }
    }

    #[test]
    fn unknown_mood_is_rejected() {
        assert!("ecstatic".parse::<Mood>().is_err());
    }
}
