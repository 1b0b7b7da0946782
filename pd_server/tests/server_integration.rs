//! Integration tests for the HTTP surface.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pd_server::api::{AppState, create_router};
use pd_server::config::WebSocketConfig;
use prisoners_dilemma::{ConnectionId, LobbyActor, RoomStore, ServerEvent};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt; // For `oneshot` method

fn test_state() -> AppState {
    AppState {
        lobby: LobbyActor::spawn(RoomStore::with_seed(7), 64),
        websocket: WebSocketConfig::default(),
    }
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health_check_on_empty_lobby() {
    let app = create_router(test_state());

    let (status, body) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["rooms"], 0);
    assert_eq!(body["connections"], 0);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_check_counts_rooms_and_connections() {
    let state = test_state();
    let (tx, mut rx) = mpsc::channel(8);
    let id = ConnectionId::new();

    state.lobby.connect(id, tx).await.unwrap();
    state
        .lobby
        .dispatch(id, prisoners_dilemma::ClientEvent::CreateRoom)
        .await
        .unwrap();

    assert!(matches!(rx.recv().await, Some(ServerEvent::Welcome { .. })));
    assert!(matches!(rx.recv().await, Some(ServerEvent::RoomCreated { .. })));

    let (status, body) = get_json(create_router(state), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rooms"], 1);
    assert_eq!(body["connections"], 1);
}

#[tokio::test]
async fn test_health_check_unavailable_when_lobby_stopped() {
    let (actor, handle) = LobbyActor::new(RoomStore::with_seed(7), 4);
    drop(actor);

    let app = create_router(AppState {
        lobby: handle,
        websocket: WebSocketConfig::default(),
    });

    let (status, body) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn test_ws_requires_upgrade() {
    let app = create_router(test_state());

    let response = app
        .oneshot(Request::builder().uri("/ws").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_router(test_state());

    let (status, _) = get_json(app, "/tables").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
