use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::class::{Class, CreateClassRequest},
};

pub struct ClassService;

impl ClassService {
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Class>, ApiError> {
        let class = sqlx::query_as::<_, Class>("SELECT * FROM classes WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(class)
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<Class>, ApiError> {
        let classes = sqlx::query_as::<_, Class>("SELECT * FROM classes ORDER BY name")
            .fetch_all(pool)
            .await?;
        Ok(classes)
    }

    pub async fn list_by_teacher(pool: &PgPool, teacher_id: Uuid) -> Result<Vec<Class>, ApiError> {
        let classes =
            sqlx::query_as::<_, Class>("SELECT * FROM classes WHERE teacher_id = $1 ORDER BY name")
                .bind(teacher_id)
                .fetch_all(pool)
                .await?;
        Ok(classes)
    }

    pub async fn create(pool: &PgPool, req: &CreateClassRequest) -> Result<Class, ApiError> {
        let class = sqlx::query_as::<_, Class>(
            "INSERT INTO classes (name, teacher_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(&req.name)
        .bind(req.teacher_id)
        .fetch_one(pool)
        .await?;
        Ok(class)
    }
}
