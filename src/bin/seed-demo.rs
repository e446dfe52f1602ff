//! Demo institution seed script
//!
//! Seeds the database with realistic demo data:
//! - 8 users: 1 admin, 1 director, 2 teachers, 4 parents
//! - 2 classes: Sunflowers, Oak Trees
//! - 6 students distributed across classes with parent links
//! - A starter badge catalogue (6 badges) and a few awards
//! - A development roadmap template with 4 ordered stages
//! - Attendance and daily reports for the last 10 week days
//!
//! Usage:
//!   DATABASE_URL=... DEMO_PASSWORD=Demo2024! ./seed-demo
//!
//! Environment variables:
//!   DATABASE_URL   — PostgreSQL connection string (required)
//!   DEMO_PASSWORD  — Password for all demo accounts (default: Demo2024!)

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use sqlx::postgres::PgPoolOptions;
use std::env;
use uuid::Uuid;

use smartkid_api::db::run_migrations;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL required")?;
    let demo_password = env::var("DEMO_PASSWORD").unwrap_or_else(|_| "Demo2024!".to_string());

    println!("=== Seed Demo Institution ===");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    run_migrations(&pool).await.context("Failed to run migrations")?;

    // 1. Clean existing data (child tables first, FK order)
    println!("Cleaning existing data...");
    for table in [
        "stage_progress",
        "student_roadmaps",
        "roadmap_stages",
        "roadmap_templates",
        "student_badges",
        "badges",
        "milestones",
        "reports",
        "attendances",
        "activities",
        "students",
        "classes",
        "users",
    ] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&pool)
            .await
            .with_context(|| format!("Failed to clean table {table}"))?;
    }

    // 2. Hash password (cost 10 for seed speed)
    let password_hash =
        bcrypt::hash(&demo_password, 10).context("Failed to hash demo password")?;

    // 3. Insert users
    println!("Inserting users...");
    let admin_id = Uuid::new_v4();
    let director_id = Uuid::new_v4();
    let teacher1_id = Uuid::new_v4();
    let teacher2_id = Uuid::new_v4();
    let parent_ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();

    let users = [
        (admin_id, "admin@demo.smartkid.app", "Alex", "Morgan", "admin"),
        (director_id, "diane@demo.smartkid.app", "Diane", "Carter", "director"),
        (teacher1_id, "sophie@demo.smartkid.app", "Sophie", "Nguyen", "teacher"),
        (teacher2_id, "marcus@demo.smartkid.app", "Marcus", "Webb", "teacher"),
        (parent_ids[0], "laura@demo.smartkid.app", "Laura", "Bennett", "parent"),
        (parent_ids[1], "james@demo.smartkid.app", "James", "Okafor", "parent"),
        (parent_ids[2], "nina@demo.smartkid.app", "Nina", "Kovacs", "parent"),
        (parent_ids[3], "david@demo.smartkid.app", "David", "Reyes", "parent"),
    ];

    for (id, email, first, last, role) in &users {
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, first_name, last_name, role)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(email)
        .bind(&password_hash)
        .bind(first)
        .bind(last)
        .bind(role)
        .execute(&pool)
        .await
        .with_context(|| format!("Failed to insert user {email}"))?;
    }

    // 4. Insert classes
    println!("Inserting classes...");
    let class_sunflowers = Uuid::new_v4();
    let class_oaks = Uuid::new_v4();

    for (id, name, teacher_id) in [
        (class_sunflowers, "Sunflowers", teacher1_id),
        (class_oaks, "Oak Trees", teacher2_id),
    ] {
        sqlx::query("INSERT INTO classes (id, name, teacher_id) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(name)
            .bind(teacher_id)
            .execute(&pool)
            .await
            .with_context(|| format!("Failed to insert class {name}"))?;
    }

    // 5. Insert students
    println!("Inserting students...");
    let today = Utc::now().date_naive();

    // (id, first_name, last_name, birth_date, parent_id, class_id)
    let students: Vec<(Uuid, &str, &str, NaiveDate, Uuid, Uuid)> = vec![
        (Uuid::new_v4(), "Mia", "Bennett", today - Duration::days(1300), parent_ids[0], class_sunflowers),
        (Uuid::new_v4(), "Leo", "Bennett", today - Duration::days(1700), parent_ids[0], class_oaks),
        (Uuid::new_v4(), "Ada", "Okafor", today - Duration::days(1450), parent_ids[1], class_sunflowers),
        (Uuid::new_v4(), "Erik", "Kovacs", today - Duration::days(1550), parent_ids[2], class_sunflowers),
        (Uuid::new_v4(), "Sofia", "Reyes", today - Duration::days(1650), parent_ids[3], class_oaks),
        (Uuid::new_v4(), "Mateo", "Reyes", today - Duration::days(1250), parent_ids[3], class_oaks),
    ];

    for (id, first_name, last_name, birth_date, parent_id, class_id) in &students {
        sqlx::query(
            "INSERT INTO students (id, first_name, last_name, date_of_birth, parent_id, class_id)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .bind(birth_date)
        .bind(parent_id)
        .bind(class_id)
        .execute(&pool)
        .await
        .with_context(|| format!("Failed to insert student {first_name}"))?;
    }

    // 6. Badge catalogue + a few awards
    println!("Inserting badges...");
    let badges = [
        (Uuid::new_v4(), "Bookworm", "Finished five picture books", "book", "academic"),
        (Uuid::new_v4(), "Counting Star", "Counted to twenty unaided", "star", "academic"),
        (Uuid::new_v4(), "Kind Heart", "Helped a classmate without being asked", "heart", "behavioral"),
        (Uuid::new_v4(), "Tidy Champion", "Cleaned up the play area all week", "broom", "behavioral"),
        (Uuid::new_v4(), "Perfect Week", "Present every day for a week", "calendar", "attendance"),
        (Uuid::new_v4(), "Shining Moment", "A special achievement worth celebrating", "trophy", "special"),
    ];

    for (id, name, description, icon, category) in &badges {
        sqlx::query(
            "INSERT INTO badges (id, name, description, icon, category)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(icon)
        .bind(category)
        .execute(&pool)
        .await
        .with_context(|| format!("Failed to insert badge {name}"))?;
    }

    for (student_idx, badge_idx, awarded_by) in [(0usize, 0usize, teacher1_id), (2, 2, teacher1_id), (4, 4, teacher2_id)] {
        sqlx::query(
            "INSERT INTO student_badges (student_id, badge_id, date_awarded, awarded_by)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(students[student_idx].0)
        .bind(badges[badge_idx].0)
        .bind(today - Duration::days(3))
        .bind(awarded_by)
        .execute(&pool)
        .await
        .context("Failed to insert badge award")?;
    }

    // 7. Roadmap template with ordered stages
    println!("Inserting roadmap template...");
    let template_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO roadmap_templates (id, name, description, age_group, created_by)
         VALUES ($1, 'Early Language', 'Language development for ages 3-4', '3-4', $2)",
    )
    .bind(template_id)
    .bind(director_id)
    .execute(&pool)
    .await
    .context("Failed to insert roadmap template")?;

    let stages = [
        (1, "Names everyday objects", "language"),
        (2, "Forms three-word sentences", "language"),
        (3, "Retells a short story", "cognitive"),
        (4, "Holds a simple conversation", "social"),
    ];
    let mut first_stage_id: Option<Uuid> = None;
    for (order, title, skill) in &stages {
        let stage_id = Uuid::new_v4();
        if first_stage_id.is_none() {
            first_stage_id = Some(stage_id);
        }
        sqlx::query(
            "INSERT INTO roadmap_stages (id, template_id, title, stage_order, skill_category)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(stage_id)
        .bind(template_id)
        .bind(title)
        .bind(order)
        .bind(skill)
        .execute(&pool)
        .await
        .with_context(|| format!("Failed to insert stage {title}"))?;
    }

    sqlx::query(
        "INSERT INTO student_roadmaps (student_id, template_id, current_stage_id)
         VALUES ($1, $2, $3)",
    )
    .bind(students[0].0)
    .bind(template_id)
    .bind(first_stage_id)
    .execute(&pool)
    .await
    .context("Failed to assign roadmap")?;

    // 8. Attendance + reports for the last 10 week days
    println!("Inserting attendance and reports...");
    let moods = ["amazing", "happy", "okay", "happy", "amazing", "okay"];
    let mut day = today;
    let mut seeded_days = 0;
    while seeded_days < 10 {
        day -= Duration::days(1);
        if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }
        seeded_days += 1;

        for (i, (student_id, first_name, ..)) in students.iter().enumerate() {
            let class_teacher = if matches!(i, 0 | 2 | 3) { teacher1_id } else { teacher2_id };
            let status = if (i + seeded_days) % 7 == 0 { "absent" } else { "present" };
            sqlx::query(
                "INSERT INTO attendances (student_id, date, status) VALUES ($1, $2, $3)",
            )
            .bind(student_id)
            .bind(day)
            .bind(status)
            .execute(&pool)
            .await
            .context("Failed to insert attendance")?;

            if status == "absent" {
                continue;
            }
            sqlx::query(
                "INSERT INTO reports (student_id, teacher_id, date, mood, activities, notes, achievements)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(student_id)
            .bind(class_teacher)
            .bind(day)
            .bind(moods[(i + seeded_days) % moods.len()])
            .bind(vec!["circle time".to_string(), "outdoor play".to_string()])
            .bind(format!("{first_name} had a good day."))
            .bind(Vec::<String>::new())
            .execute(&pool)
            .await
            .context("Failed to insert report")?;
        }
    }

    println!("Done. Demo accounts use password: {demo_password}");
    Ok(())
}
