use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use redis::Client as RedisClient;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smartkid_api::config::Config;
use smartkid_api::middleware::auth::JwtSecret;
use smartkid_api::{db, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let config = Arc::new(config);

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let redis_client = RedisClient::open(config.redis_url.as_str())?;
    let redis_conn = redis_client.get_multiplexed_async_connection().await?;
    info!("Redis connected");

    let state = AppState {
        db: pool,
        redis: redis_conn,
        config: config.clone(),
    };

    // CORS: allow the configured app origin; localhost is always allowed
    // for local development.
    let base_url = config.app_base_url.clone();
    let cors_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let o = match origin.to_str() {
            Ok(s) => s,
            Err(_) => return false,
        };
        if o.starts_with("http://localhost") || o.starts_with("http://127.0.0.1") {
            return true;
        }
        o == base_url
    });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_origin(cors_origin);

    let jwt_secret = JwtSecret(config.jwt_secret.clone());

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        // Auth
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/me", get(routes::auth::me))
        // Students
        .route("/api/students", get(routes::students::list_students).post(routes::students::create_student))
        .route(
            "/api/students/{id}",
            get(routes::students::get_student)
                .put(routes::students::update_student)
                .delete(routes::students::delete_student),
        )
        // Classes
        .route("/api/classes", get(routes::classes::list_classes).post(routes::classes::create_class))
        // Attendance
        .route("/api/attendance", get(routes::attendance::list_attendance).post(routes::attendance::create_attendance))
        .route("/api/attendance/{id}", put(routes::attendance::update_attendance))
        // Reports
        .route("/api/reports", get(routes::reports::list_reports).post(routes::reports::create_report))
        .route("/api/reports/{id}", get(routes::reports::get_report).put(routes::reports::update_report))
        // Activities
        .route("/api/activities", get(routes::activities::list_activities).post(routes::activities::create_activity))
        // Milestones
        .route("/api/milestones", get(routes::milestones::list_milestones).post(routes::milestones::create_milestone))
        .route("/api/milestones/{id}", get(routes::milestones::get_milestone).put(routes::milestones::update_milestone))
        // Badges
        .route("/api/badges", get(routes::badges::list_badges).post(routes::badges::create_badge))
        .route("/api/badges/{id}", get(routes::badges::get_badge))
        .route("/api/student-badges", get(routes::badges::list_student_badges).post(routes::badges::award_student_badge))
        // Development roadmaps
        .route("/api/roadmap-templates", get(routes::roadmap::list_templates).post(routes::roadmap::create_template))
        .route("/api/roadmap-templates/{id}/stages", get(routes::roadmap::list_template_stages))
        .route("/api/roadmap-stages", post(routes::roadmap::create_stage))
        .route("/api/student-roadmaps", get(routes::roadmap::list_student_roadmaps).post(routes::roadmap::assign_roadmap))
        .route("/api/stage-progress", get(routes::roadmap::list_stage_progress).put(routes::roadmap::upsert_stage_progress))
        // Admin
        .route("/api/admin/stats", get(routes::admin::admin_stats))
        .route("/api/admin/users", get(routes::admin::list_users).post(routes::admin::create_user))
        .layer(axum::Extension(jwt_secret))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("smartkid API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
