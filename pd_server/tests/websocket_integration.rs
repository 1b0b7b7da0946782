//! End-to-end tests driving real WebSocket clients against a live server.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use pd_server::api::{AppState, create_router};
use pd_server::config::WebSocketConfig;
use prisoners_dilemma::{Choice, ConnectionId, LobbyActor, MATCH_ROUNDS, RoomCode, RoomStore, ServerEvent};
use serde_json::json;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server(websocket: WebSocketConfig) -> SocketAddr {
    let state = AppState {
        lobby: LobbyActor::spawn(RoomStore::with_seed(42), 64),
        websocket,
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });

    addr
}

struct Player {
    id: ConnectionId,
    socket: Socket,
}

impl Player {
    async fn connect(addr: SocketAddr) -> Self {
        let (socket, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
        let mut player = Self {
            id: ConnectionId::default(),
            socket,
        };

        match player.recv().await {
            ServerEvent::Welcome { player_id } => player.id = player_id,
            other => panic!("expected welcome, got {other:?}"),
        }
        player
    }

    async fn send(&mut self, value: serde_json::Value) {
        self.send_raw(&value.to_string()).await;
    }

    async fn send_raw(&mut self, text: &str) {
        self.socket.send(Message::text(text.to_string())).await.unwrap();
    }

    async fn recv(&mut self) -> ServerEvent {
        loop {
            let msg = timeout(Duration::from_secs(2), self.socket.next())
                .await
                .expect("timed out waiting for event")
                .expect("socket closed")
                .unwrap();

            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).unwrap();
            }
        }
    }

    async fn assert_silent(&mut self) {
        let next = timeout(Duration::from_millis(100), self.socket.next()).await;
        assert!(next.is_err(), "unexpected frame: {next:?}");
    }

    async fn create_room(&mut self) -> RoomCode {
        self.send(json!({"type": "create-room"})).await;
        match self.recv().await {
            ServerEvent::RoomCreated { room_id } => room_id,
            other => panic!("expected room-created, got {other:?}"),
        }
    }

    async fn choose(&mut self, room: &RoomCode, choice: Choice) {
        self.send(json!({
            "type": "player-choice",
            "roomId": room,
            "playerId": self.id,
            "choice": choice,
        }))
        .await;
    }
}

async fn paired(addr: SocketAddr) -> (Player, Player, RoomCode) {
    let mut a = Player::connect(addr).await;
    let mut b = Player::connect(addr).await;

    let room = a.create_room().await;
    b.send(json!({"type": "join-room", "roomId": room})).await;

    let expected = ServerEvent::RoomReady {
        players: vec![a.id, b.id],
    };
    assert_eq!(a.recv().await, expected);
    assert_eq!(b.recv().await, expected);

    (a, b, room)
}

#[tokio::test]
async fn test_full_match_over_websocket() {
    let addr = spawn_server(WebSocketConfig::default()).await;
    let (mut a, mut b, room) = paired(addr).await;

    for round in 1..=MATCH_ROUNDS {
        a.choose(&room, Choice::Cooperate).await;
        b.choose(&room, Choice::Defect).await;

        let expected = ServerEvent::RoundResult {
            choices: BTreeMap::from([(a.id, Choice::Cooperate), (b.id, Choice::Defect)]),
            scores: BTreeMap::from([(a.id, 0), (b.id, 5 * round)]),
            round,
        };
        assert_eq!(a.recv().await, expected);
        assert_eq!(b.recv().await, expected);
    }

    let over = ServerEvent::GameOver {
        scores: BTreeMap::from([(a.id, 0), (b.id, 25)]),
    };
    assert_eq!(a.recv().await, over);
    assert_eq!(b.recv().await, over);

    // Finished rooms are gone
    let mut c = Player::connect(addr).await;
    c.send(json!({"type": "join-room", "roomId": room})).await;
    assert_eq!(
        c.recv().await,
        ServerEvent::JoinError {
            message: "Room not found".to_string()
        }
    );
}

#[tokio::test]
async fn test_join_errors_reach_requester_only() {
    let addr = spawn_server(WebSocketConfig::default()).await;
    let (mut a, mut b, room) = paired(addr).await;

    let mut c = Player::connect(addr).await;
    c.send(json!({"type": "join-room", "roomId": room})).await;
    assert_eq!(
        c.recv().await,
        ServerEvent::JoinError {
            message: "Room is full".to_string()
        }
    );

    c.send(json!({"type": "join-room", "roomId": "ZZZZZZ"})).await;
    assert_eq!(
        c.recv().await,
        ServerEvent::JoinError {
            message: "Room not found".to_string()
        }
    );

    a.assert_silent().await;
    b.assert_silent().await;
}

#[tokio::test]
async fn test_lowercase_code_joins() {
    let addr = spawn_server(WebSocketConfig::default()).await;
    let mut a = Player::connect(addr).await;
    let mut b = Player::connect(addr).await;

    let room = a.create_room().await;
    b.send(json!({"type": "join-room", "roomId": room.as_str().to_lowercase()}))
        .await;

    assert!(matches!(b.recv().await, ServerEvent::RoomReady { .. }));
    assert!(matches!(a.recv().await, ServerEvent::RoomReady { .. }));
}

#[tokio::test]
async fn test_disconnect_notifies_opponent() {
    let addr = spawn_server(WebSocketConfig::default()).await;
    let (a, mut b, _room) = paired(addr).await;
    let departed = a.id;

    drop(a);

    assert_eq!(
        b.recv().await,
        ServerEvent::PlayerDisconnected {
            player_id: departed
        }
    );
}

#[tokio::test]
async fn test_malformed_frames_are_ignored() {
    let addr = spawn_server(WebSocketConfig::default()).await;
    let mut a = Player::connect(addr).await;

    a.send_raw("not json").await;
    a.send(json!({"type": "shuffle"})).await;
    a.send(json!({"type": "join-room"})).await;
    a.assert_silent().await;

    // Socket stays usable afterwards
    let room = a.create_room().await;
    assert_eq!(room.as_str().len(), prisoners_dilemma::constants::ROOM_CODE_LEN);
}

#[tokio::test]
async fn test_burst_limit_drops_excess_frames() {
    let addr = spawn_server(WebSocketConfig {
        burst_limit: 1,
        burst_window_secs: 60,
        ..WebSocketConfig::default()
    })
    .await;
    let mut a = Player::connect(addr).await;

    a.create_room().await;
    a.send(json!({"type": "create-room"})).await;
    a.assert_silent().await;
}
