use axum::{
    routing::{delete, get, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::storage::SqliteStore;

pub mod routes;

/// Server state
///
/// Owns the single store handle; handlers borrow it through the mutex so
/// the SQLite connection never leaves this struct.
pub struct AppState {
    pub store: Mutex<SqliteStore>,
}

/// Assemble the API router around a shared state
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/devices",
            get(routes::list_devices).post(routes::add_device),
        )
        .route(
            "/api/devices/{id}",
            put(routes::update_device).delete(routes::delete_device),
        )
        .route("/api/devices/{id}/history", get(routes::device_history))
        .route("/api/staff", get(routes::list_staff).post(routes::add_staff))
        .route("/api/staff/{id}", delete(routes::delete_staff))
        .route("/api/wards", get(routes::list_wards).post(routes::add_ward))
        .route("/api/wards/{id}", delete(routes::delete_ward))
        .fallback_service(ServeDir::new("public"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(port: u16, store: SqliteStore) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        store: Mutex::new(store),
    });

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);
    println!("🌍 Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM. In-flight requests drain before the
/// store handle drops.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
