mod core;
mod features;
mod modules;
mod shared;

use crate::core::app::{api_routes, db_health_routes, with_http_layers, AppServices};
use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, OpenApiInfoModifier};
use crate::core::{database, middleware};
use crate::features::files::PgFileRepository;
use crate::features::users::PgUserRepository;
use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!(
        "Configuration loaded: database={}, max_upload_size={}, quota_bytes={}",
        config.database.redacted_url(),
        config.storage.max_upload_size,
        config.storage.quota_bytes
    );

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Repositories and services
    let services = AppServices::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgFileRepository::new(pool.clone())),
        &config.session,
        &config.storage,
    );
    tracing::info!("Services initialized");

    // OpenAPI document with info from config
    let info_modifier = OpenApiInfoModifier {
        title: config.openapi.title.clone(),
        version: config.openapi.version.clone(),
        description: config.openapi.description.clone(),
    };
    let mut openapi = ApiDoc::openapi();
    info_modifier.modify(&mut openapi);

    let docs = Router::new().route(
        "/api-docs/openapi.json",
        get(move || {
            let doc = openapi.clone();
            async move { Json(doc) }
        }),
    );
    let docs = if let Some(credentials) = config.openapi.credentials() {
        tracing::info!("OpenAPI document basic auth enabled");
        docs.layer(from_fn_with_state(
            Arc::new(credentials),
            middleware::basic_auth_middleware,
        ))
    } else {
        tracing::info!("OpenAPI document basic auth disabled (no credentials configured)");
        docs
    };

    let app = with_http_layers(
        Router::new()
            .merge(docs)
            .merge(db_health_routes(pool))
            .merge(api_routes(services)),
        config.app.cors_allowed_origins.clone(),
    );

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    // Uploads are buffered whole, give the socket room
    socket.set_recv_buffer_size(1024 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("OpenAPI document at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
