use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::student::{CreateStudentRequest, Student, UpdateStudentRequest},
    policy::{self, Caller, StudentOwnership, StudentScope},
};

pub struct StudentService;

impl StudentService {
    /// List exactly the students the caller is entitled to see.
    pub async fn list_visible(pool: &PgPool, caller: &Caller) -> Result<Vec<Student>, ApiError> {
        let students = match policy::student_scope(caller) {
            StudentScope::All => {
                sqlx::query_as::<_, Student>(
                    "SELECT * FROM students ORDER BY last_name, first_name",
                )
                .fetch_all(pool)
                .await?
            }
            StudentScope::ChildrenOf(parent_id) => {
                sqlx::query_as::<_, Student>(
                    "SELECT * FROM students WHERE parent_id = $1 ORDER BY last_name, first_name",
                )
                .bind(parent_id)
                .fetch_all(pool)
                .await?
            }
            StudentScope::TaughtBy(teacher_id) => {
                sqlx::query_as::<_, Student>(
                    "SELECT s.* FROM students s
                     JOIN classes c ON c.id = s.class_id
                     WHERE c.teacher_id = $1
                     ORDER BY s.last_name, s.first_name",
                )
                .bind(teacher_id)
                .fetch_all(pool)
                .await?
            }
        };
        Ok(students)
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Student>, ApiError> {
        let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(student)
    }

    /// Resolve the ownership facts the policy layer decides on: the
    /// student's parent and the teacher of its enrolling class.
    pub async fn ownership(pool: &PgPool, student: &Student) -> Result<StudentOwnership, ApiError> {
        let teacher_id = match student.class_id {
            Some(class_id) => {
                sqlx::query_scalar::<_, Option<Uuid>>(
                    "SELECT teacher_id FROM classes WHERE id = $1",
                )
                .bind(class_id)
                .fetch_optional(pool)
                .await?
                .flatten()
            }
            None => None,
        };
        Ok(StudentOwnership { parent_id: student.parent_id, teacher_id })
    }

    /// Fetch a student the caller may read, or fail exactly as if the
    /// student did not exist. Every record reachable through a studentId
    /// goes through this gate.
    pub async fn authorize_view(
        pool: &PgPool,
        caller: &Caller,
        student_id: Uuid,
    ) -> Result<Student, ApiError> {
        let student = Self::get(pool, student_id)
            .await?
            .ok_or(ApiError::NotFound("Student"))?;
        let ownership = Self::ownership(pool, &student).await?;
        policy::can_view_student(caller, &ownership).map_err(|d| d.api("Student"))?;
        Ok(student)
    }

    pub async fn create(pool: &PgPool, req: &CreateStudentRequest) -> Result<Student, ApiError> {
        let student = sqlx::query_as::<_, Student>(
            "INSERT INTO students (first_name, last_name, date_of_birth, profile_image, parent_id, class_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(req.date_of_birth)
        .bind(&req.profile_image)
        .bind(req.parent_id)
        .bind(req.class_id)
        .fetch_one(pool)
        .await?;
        Ok(student)
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateStudentRequest,
    ) -> Result<Student, ApiError> {
        let student = sqlx::query_as::<_, Student>(
            "UPDATE students
             SET first_name    = COALESCE($1, first_name),
                 last_name     = COALESCE($2, last_name),
                 date_of_birth = COALESCE($3, date_of_birth),
                 profile_image = COALESCE($4, profile_image),
                 parent_id     = COALESCE($5, parent_id),
                 class_id      = COALESCE($6, class_id)
             WHERE id = $7
             RETURNING *",
        )
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(req.date_of_birth)
        .bind(&req.profile_image)
        .bind(req.parent_id)
        .bind(req.class_id)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::NotFound("Student"))?;
        Ok(student)
    }

    /// Hard-delete a student and the records hanging off it. Student is the
    /// only entity with a delete flow.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM attendances WHERE student_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM reports WHERE student_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM milestones WHERE student_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM student_badges WHERE student_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "DELETE FROM stage_progress WHERE student_roadmap_id IN
               (SELECT id FROM student_roadmaps WHERE student_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM student_roadmaps WHERE student_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(ApiError::NotFound("Student"));
        }

        tx.commit().await?;
        Ok(())
    }
}
