use serde::Serialize;
use sqlx::PgPool;

use crate::error::ApiError;

/// Mood histogram over recent reports.
#[derive(Debug, Default, Clone, Serialize, PartialEq, Eq)]
pub struct MoodCounts {
    pub amazing: i64,
    pub happy: i64,
    pub okay: i64,
    pub sad: i64,
    pub upset: i64,
}

impl MoodCounts {
    /// Build from `(mood, count)` rows of a GROUP BY query. Unknown mood
    /// values are ignored; the CHECK constraint keeps them out anyway.
    pub fn from_rows(rows: &[(String, i64)]) -> Self {
        let mut counts = MoodCounts::default();
        for (mood, n) in rows {
            match mood.as_str() {
                "amazing" => counts.amazing += n,
                "happy" => counts.happy += n,
                "okay" => counts.okay += n,
                "sad" => counts.sad += n,
                "upset" => counts.upset += n,
                _ => {}
            }
        }
        counts
    }

    pub fn total(&self) -> i64 {
        self.amazing + self.happy + self.okay + self.sad + self.upset
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_students: i64,
    pub total_teachers: i64,
    pub total_parents: i64,
    pub total_classes: i64,
    pub total_reports: i64,
    pub recent_reports_count: i64,
    pub mood_counts: MoodCounts,
}

pub struct StatsService;

impl StatsService {
    /// Institution-wide aggregates via direct COUNT/GROUP BY queries.
    /// `recent` means reports dated within the last 7 calendar days; the
    /// mood histogram is computed over the same window, so its total always
    /// equals `recent_reports_count`.
    pub async fn admin_stats(pool: &PgPool) -> Result<AdminStats, ApiError> {
        let total_students: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
            .fetch_one(pool)
            .await?;
        let total_teachers: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'teacher'")
                .fetch_one(pool)
                .await?;
        let total_parents: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'parent'")
                .fetch_one(pool)
                .await?;
        let total_classes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM classes")
            .fetch_one(pool)
            .await?;
        let total_reports: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reports")
            .fetch_one(pool)
            .await?;

        let mood_rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT mood, COUNT(*) FROM reports
             WHERE date >= CURRENT_DATE - 7 AND date <= CURRENT_DATE
             GROUP BY mood",
        )
        .fetch_all(pool)
        .await?;
        let mood_counts = MoodCounts::from_rows(&mood_rows);

        Ok(AdminStats {
            total_students,
            total_teachers,
            total_parents,
            total_classes,
            total_reports,
            recent_reports_count: mood_counts.total(),
            mood_counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_totals_match_recent_count() {
        let rows = vec![
            ("amazing".to_string(), 3),
            ("happy".to_string(), 5),
            ("upset".to_string(), 1),
        ];
        let counts = MoodCounts::from_rows(&rows);
        assert_eq!(counts.amazing, 3);
        assert_eq!(counts.happy, 5);
        assert_eq!(counts.upset, 1);
        assert_eq!(counts.okay, 0);
        assert_eq!(counts.sad, 0);
        assert_eq!(counts.total(), 9);
    }

    #[test]
    fn empty_window_is_all_zeroes() {
        let counts = MoodCounts::from_rows(&[]);
        assert_eq!(counts, MoodCounts::default());
        assert_eq!(counts.total(), 0);
    }
}
