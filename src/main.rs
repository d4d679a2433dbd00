mod auth;
mod config;
mod db;
mod tasks;
mod validation;

use std::sync::Arc;

use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    AccessTokenResponse, AuthService, IdentityResolver, LoginRequest, PasswordHasher,
    PgUserRepository, RefreshRequest, RegisterRequest, TokenPairResponse, TokenService, UserStore,
    UserResponse,
};
use config::AppConfig;
use tasks::{
    CreateTaskRequest, PgTaskRepository, TaskResponse, TaskStore, UpdateTaskRequest,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::me,
        auth::handlers::refresh,
        tasks::handlers::list_tasks,
        tasks::handlers::create_task,
        tasks::handlers::get_task,
        tasks::handlers::update_task,
        tasks::handlers::delete_task,
        health,
    ),
    components(
        schemas(
            UserResponse,
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            TokenPairResponse,
            AccessTokenResponse,
            TaskResponse,
            CreateTaskRequest,
            UpdateTaskRequest,
            HealthResponse,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and token management"),
        (name = "tasks", description = "Owner-scoped task management endpoints"),
        (name = "health", description = "Service health probe")
    ),
    info(
        title = "Task API",
        version = "0.1.0",
        description = "Task management API with token-based authentication and per-user resource ownership"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub identity: IdentityResolver,
    pub tasks: Arc<dyn TaskStore>,
}

/// Health check response model
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Handler for GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
pub fn create_router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Health probe
        .route("/health", get(health))
        // Auth routes
        .route("/api/v1/auth/register", post(auth::handlers::register))
        .route("/api/v1/auth/login", post(auth::handlers::login))
        .route("/api/v1/auth/me", get(auth::handlers::me))
        .route("/api/v1/auth/refresh", post(auth::handlers::refresh))
        // Task routes
        .route(
            "/api/v1/tasks",
            get(tasks::handlers::list_tasks).post(tasks::handlers::create_task),
        )
        .route(
            "/api/v1/tasks/:id",
            get(tasks::handlers::get_task)
                .put(tasks::handlers::update_task)
                .delete(tasks::handlers::delete_task),
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

    tracing::info!("Task API - Starting...");

    // Collect configuration once; components receive it explicitly
    let config = AppConfig::from_env().expect("Invalid configuration");

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

    // Wire up the stores and services
    let users: Arc<dyn UserStore> = Arc::new(PgUserRepository::new(db_pool.clone()));
    let task_store: Arc<dyn TaskStore> = Arc::new(PgTaskRepository::new(db_pool));
    let token_service = TokenService::new(&config.auth);

    let state = AppState {
        auth: AuthService::new(users.clone(), PasswordHasher::new(), token_service.clone()),
        identity: IdentityResolver::new(token_service, users),
        tasks: task_store,
    };

    // Create the application router
    let app = create_router(state);

    // Start the Axum server
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Task API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

#[cfg(test)]
mod tests;
