use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::core::config::{SessionConfig, StorageConfig};
use crate::core::error::Result;
use crate::core::{database, middleware};
use crate::features::auth::{routes as auth_routes, AuthService, SessionService};
use crate::features::dashboard::{routes as dashboard_routes, DashboardService};
use crate::features::files::{routes as files_routes, FileRepository, FileService};
use crate::features::users::{routes as users_routes, UserProfileService, UserRepository};

/// Every service the HTTP layer needs, wired over the given repositories
#[derive(Clone)]
pub struct AppServices {
    pub sessions: Arc<SessionService>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserProfileService>,
    pub files: Arc<FileService>,
    pub dashboard: Arc<DashboardService>,
}

impl AppServices {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        file_repository: Arc<dyn FileRepository>,
        session: &SessionConfig,
        storage: &StorageConfig,
    ) -> Self {
        let sessions = Arc::new(SessionService::new(session));
        let auth = Arc::new(AuthService::new(
            Arc::clone(&user_repository),
            Arc::clone(&sessions),
        ));
        let users = Arc::new(UserProfileService::new(user_repository));
        let files = Arc::new(FileService::new(
            Arc::clone(&file_repository),
            storage.clone(),
        ));
        let dashboard = Arc::new(DashboardService::new(file_repository, storage.quota_bytes));

        Self {
            sessions,
            auth,
            users,
            files,
            dashboard,
        }
    }
}

/// API routes: public auth routes, session-protected feature routes and `/health`
pub fn api_routes(services: AppServices) -> Router {
    // Protected routes (require a valid session)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&services.auth)))
        .merge(users_routes::routes(services.users))
        .merge(files_routes::routes(services.files))
        .merge(dashboard_routes::routes(services.dashboard))
        .route_layer(from_fn_with_state(
            Arc::clone(&services.sessions),
            middleware::auth_middleware,
        ));

    // Public routes (no session required)
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(services.auth))
        .route("/health", get(health_check));

    Router::new().merge(protected_routes).merge(public_routes)
}

/// Database connectivity check, kept separate so the API can run without a pool in tests
pub fn db_health_routes(pool: PgPool) -> Router {
    Router::new()
        .route("/health/db", get(db_health_check))
        .with_state(pool)
}

/// Request id, tracing and CORS layers shared by every route
pub fn with_http_layers(router: Router, cors_allowed_origins: Vec<String>) -> Router {
    router.layer(
        ServiceBuilder::new()
            // Generate X-Request-Id using UUID v7 (or use client-provided one)
            .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(middleware::MakeSpanWithRequestId)
                    .on_request(DefaultOnRequest::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            // Propagate X-Request-Id to response headers
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(middleware::cors_layer(cors_allowed_origins)),
    )
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

async fn db_health_check(State(pool): State<PgPool>) -> Result<Json<Value>> {
    database::ping(&pool).await?;
    Ok(Json(json!({ "status": "ok", "database": "reachable" })))
}
