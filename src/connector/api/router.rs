use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use tokio::net::TcpListener;
use tracing::info;

use super::container::Container;
use super::controller::{
    ChatController, ChatRequest, ChatResponse, StatusController, StatusResponse,
};
use super::cors;
use super::ApiError;

async fn handle_status(State(container): State<Arc<Container>>) -> Json<StatusResponse> {
    Json(StatusController::new(&container).status())
}

async fn handle_chat(
    State(container): State<Arc<Container>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    ChatController::new(&container).chat(payload).await
}

/// `GET /`, `POST /api/chat` and its CORS preflight.
pub fn build_router(container: Arc<Container>) -> Router {
    Router::new()
        .route("/", get(handle_status))
        .route("/api/chat", post(handle_chat).options(cors::preflight))
        .layer(middleware::from_fn(cors::allow_any_origin))
        .with_state(container)
}

/// Serve until Ctrl+C or SIGTERM; in-flight requests complete before exit.
pub async fn serve(container: Arc<Container>, bind_addr: &str) -> Result<()> {
    let app = build_router(container);
    let listener = TcpListener::bind(bind_addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
