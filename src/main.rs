mod admin;
mod auth;
mod batches;
mod config;
mod db;
mod error;
mod response;
mod users;
mod validation;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use admin::AdminRepository;
use auth::{AuthError, PasswordService, TokenService};
use batches::{BatchRepository, BatchService};
use config::AppConfig;
use users::UserRepository;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        admin::handlers::register_admin,
        admin::handlers::login_admin,
        admin::handlers::list_teachers,
    ),
    components(
        schemas(
            admin::models::RegisterAdminRequest,
            admin::models::LoginAdminRequest,
            admin::models::RegisterAdminResponse,
            admin::models::LoginAdminResponse,
            admin::models::TeachersResponse,
            admin::models::AdminPublic,
            admin::models::AdminLoginFields,
            auth::Role,
        )
    ),
    tags(
        (name = "admin", description = "Administrator registration, login, and batch management")
    ),
    info(
        title = "Batchroom API",
        version = "1.0.0",
        description = "Classroom batch management backend: admins create batches and post announcements, students and parents join and view them"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: TokenService,
    pub passwords: Arc<PasswordService>,
    pub admins: AdminRepository,
    pub users: UserRepository,
    pub batches: BatchService,
}

impl AppState {
    pub fn new(db: PgPool, config: &AppConfig) -> Result<Self, AuthError> {
        let tokens = TokenService::new(config.jwt_secret.clone());
        let passwords = Arc::new(PasswordService::new(config.hash_cost)?);
        let admins = AdminRepository::new(db.clone());
        let users = UserRepository::new(db.clone());
        let batches = BatchService::new(BatchRepository::new(db.clone()));

        Ok(Self {
            db,
            tokens,
            passwords,
            admins,
            users,
            batches,
        })
    }
}

// Lets the AuthenticatedUser extractor verify tokens against the service in
// state instead of re-reading configuration per request
impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Creates and configures the application router
fn create_router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Admin routes
        .route("/admin/register", post(admin::handlers::register_admin))
        .route("/admin/login", post(admin::handlers::login_admin))
        .route("/admin/teachers", get(admin::handlers::list_teachers))
        .route(
            "/admin/batches",
            post(batches::handlers::create_batch).get(batches::handlers::list_batches),
        )
        .route("/admin/batches/:batch_id", get(batches::handlers::get_batch))
        .route(
            "/admin/batches/:batch_id/students",
            post(batches::handlers::add_students),
        )
        .route(
            "/admin/batches/:batch_id/announcements",
            post(batches::handlers::create_announcement)
                .get(batches::handlers::list_announcements),
        )
        // User routes
        .route("/user/register", post(users::handlers::register_user))
        .route("/user/login", post(users::handlers::login_user))
        .route("/user/login/student", post(users::handlers::login_student))
        .route("/user/login/parent", post(users::handlers::login_parent))
        .route("/user/profile", put(users::handlers::update_profile))
        .route("/user/join-batch", post(users::handlers::join_batch))
        .route("/user/my-batches", get(users::handlers::my_batches))
        .route(
            "/user/parent/student-batches",
            get(users::handlers::parent_student_batches),
        )
        .route(
            "/user/student/batches/:batch_id",
            get(users::handlers::student_batch_detail),
        )
        .route(
            "/user/parent/batches/:batch_id",
            get(users::handlers::parent_batch_detail),
        )
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Batchroom API - Starting...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(message) => {
            tracing::error!("Configuration error: {}", message);
            std::process::exit(1);
        }
    };

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let state = AppState::new(db_pool, &config).expect("Failed to initialize services");
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Batchroom API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}

#[cfg(test)]
mod tests;
