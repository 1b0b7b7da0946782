//! HTTP/WebSocket API for the match server.
//!
//! # Endpoints
//!
//! - `GET /ws` - WebSocket carrying the JSON match protocol
//! - `GET /health` - Server health status
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use pd_server::api::{AppState, create_router};
//! use pd_server::config::WebSocketConfig;
//! use prisoners_dilemma::{LobbyActor, RoomStore};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let state = AppState {
//!     lobby: LobbyActor::spawn(RoomStore::new(), 256),
//!     websocket: WebSocketConfig::default(),
//! };
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is permissive so browser clients served from any origin can connect.

pub mod rate_limiter;
pub mod websocket;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use prisoners_dilemma::LobbyHandle;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::config::WebSocketConfig;

/// Application state shared across all HTTP handlers and WebSocket connections.
///
/// Cloned per request; the lobby handle is a channel sender.
#[derive(Clone)]
pub struct AppState {
    /// Handle to the lobby actor that owns every room
    pub lobby: LobbyHandle,
    /// Per-socket limits
    pub websocket: WebSocketConfig,
}

/// Create the API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ws", get(websocket::websocket_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` while the lobby actor answers, `503 Service Unavailable`
/// otherwise.
///
/// # Example
///
/// ```bash
/// curl http://localhost:3001/health
/// # {"status":"healthy","version":"0.1.0","rooms":2,"connections":3,"timestamp":"..."}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (status_code, body) = match state.lobby.stats().await {
        Ok(stats) => {
            crate::metrics::rooms_active(stats.rooms);
            (
                StatusCode::OK,
                json!({
                    "status": "healthy",
                    "version": env!("CARGO_PKG_VERSION"),
                    "rooms": stats.rooms,
                    "connections": stats.connections,
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                }),
            )
        }
        Err(e) => {
            log::error!("Lobby unavailable: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({
                    "status": "unhealthy",
                    "version": env!("CARGO_PKG_VERSION"),
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                }),
            )
        }
    };

    (status_code, Json(body))
}
