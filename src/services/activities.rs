use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::class::{Activity, CreateActivityRequest},
};

pub struct ActivityService;

impl ActivityService {
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Activity>, ApiError> {
        let activities = sqlx::query_as::<_, Activity>("SELECT * FROM activities ORDER BY name")
            .fetch_all(pool)
            .await?;
        Ok(activities)
    }

    pub async fn list_by_class(pool: &PgPool, class_id: Uuid) -> Result<Vec<Activity>, ApiError> {
        let activities = sqlx::query_as::<_, Activity>(
            "SELECT * FROM activities WHERE class_id = $1 ORDER BY name",
        )
        .bind(class_id)
        .fetch_all(pool)
        .await?;
        Ok(activities)
    }

    pub async fn create(pool: &PgPool, req: &CreateActivityRequest) -> Result<Activity, ApiError> {
        let activity = sqlx::query_as::<_, Activity>(
            "INSERT INTO activities (name, class_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(&req.name)
        .bind(req.class_id)
        .fetch_one(pool)
        .await?;
        Ok(activity)
    }
}
