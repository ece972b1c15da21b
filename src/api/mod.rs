//! HTTP surface: the HTML listing, its progress form, and a JSON API.

mod json;
mod pages;

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracker_core::{Database, ListParams};

use crate::config::ServerConfig;
use crate::debounce::ProgressDebouncer;
use crate::error::AppError;

pub use json::{HealthResponse, TaskListing};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub debouncer: ProgressDebouncer,
}

impl AppState {
    pub fn new(db: Database, debounce: Duration) -> Self {
        let debouncer = ProgressDebouncer::new(db.clone(), debounce);
        Self { db, debouncer }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/progress", post(pages::submit_progress))
        .route("/health", get(json::health))
        .route("/api/tasks", get(json::list_tasks))
        .route("/api/tasks/{id}", get(json::get_task))
        .route("/api/tasks/{id}/progress", get(json::task_progress))
        .route("/api/progress", post(json::record_progress))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the router until Ctrl+C or SIGTERM, then cancels pending writes.
pub async fn serve(db: Database, config: &ServerConfig) -> anyhow::Result<()> {
    let state = AppState::new(db, config.debounce());
    let debouncer = state.debouncer.clone();
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    tracing::info!(
        "Tracker listening on http://{} (debounce {:?})",
        config.addr(),
        debouncer.window()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    debouncer.shutdown();
    tracing::info!("Tracker server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Decodes `search`/`page` from a raw query string.
fn decode_params(query: Option<&str>) -> Result<ListParams, AppError> {
    serde_urlencoded::from_str(query.unwrap_or_default())
        .map_err(|e| AppError::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        create_router(AppState::new(db, Duration::ZERO))
    }

    #[tokio::test]
    async fn health_route_answers() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn bad_page_is_bad_request() {
        let response = test_app()
            .oneshot(Request::get("/api/tasks?page=x").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn decodes_defaults_from_missing_query() {
        assert_eq!(decode_params(None).unwrap(), ListParams::default());
        assert_eq!(decode_params(Some("")).unwrap(), ListParams::default());
    }

    #[test]
    fn decodes_encoded_search() {
        let params = decode_params(Some("search=a%26b+c&page=2")).unwrap();
        assert_eq!(params, ListParams::new("a&b c", 2));
    }

    #[test]
    fn rejects_bad_page() {
        assert!(matches!(
            decode_params(Some("page=abc")),
            Err(AppError::Validation(_))
        ));
    }
}
