//! WebSocket client for playing a match from the terminal.

use std::fmt;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use prisoners_dilemma::{ClientEvent, ConnectionId, RoomCode, Scores, ServerEvent};
use tokio::io::AsyncBufReadExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::commands::{Command, HELP_TEXT, parse_command};

/// Why a command could not be turned into a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The server has not sent `welcome` yet
    NotConnected,
    /// Choices need a room
    NotInRoom,
    /// Help and quit are handled locally
    Local,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "Still waiting for the server to greet us"),
            Self::NotInRoom => write!(f, "Create or join a room first"),
            Self::Local => write!(f, "Command is handled by the client"),
        }
    }
}

impl std::error::Error for CommandError {}

/// What the client knows about its own match.
#[derive(Debug, Default)]
pub struct MatchTracker {
    me: Option<ConnectionId>,
    room: Option<RoomCode>,
    /// Code of a join request still waiting for an answer
    joining: Option<RoomCode>,
}

impl MatchTracker {
    pub fn me(&self) -> Option<ConnectionId> {
        self.me
    }

    pub fn room(&self) -> Option<&RoomCode> {
        self.room.as_ref()
    }

    /// Update from a server event.
    pub fn observe(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::Welcome { player_id } => self.me = Some(*player_id),
            ServerEvent::RoomCreated { room_id } => self.room = Some(room_id.clone()),
            ServerEvent::RoomReady { .. } => {
                if let Some(code) = self.joining.take() {
                    self.room = Some(code);
                }
            }
            ServerEvent::JoinError { .. } => self.joining = None,
            ServerEvent::GameOver { .. } => self.room = None,
            _ => {}
        }
    }

    /// Remember the code we asked to join until the server answers.
    pub fn joining(&mut self, code: &RoomCode) {
        self.joining = Some(code.clone());
    }

    /// Build the frame for `command`.
    pub fn event_for(&self, command: &Command) -> Result<ClientEvent, CommandError> {
        match command {
            Command::Create => Ok(ClientEvent::CreateRoom),
            Command::Join(code) => Ok(ClientEvent::JoinRoom {
                room_id: code.clone(),
            }),
            Command::Choose(choice) => {
                let player_id = self.me.ok_or(CommandError::NotConnected)?;
                let room_id = self.room.clone().ok_or(CommandError::NotInRoom)?;
                Ok(ClientEvent::PlayerChoice {
                    room_id,
                    player_id,
                    choice: *choice,
                })
            }
            Command::Help | Command::Quit => Err(CommandError::Local),
        }
    }

    /// One human-readable line for `event`.
    pub fn describe(&self, event: &ServerEvent) -> String {
        match event {
            ServerEvent::Welcome { player_id } => format!("Connected as {}", player_id),
            ServerEvent::RoomCreated { room_id } => {
                format!("Room {} created. Share the code and wait for an opponent.", room_id)
            }
            ServerEvent::RoomReady { .. } => {
                "Opponent found! Type 'c' to cooperate or 'd' to defect.".to_string()
            }
            ServerEvent::JoinError { message } => format!("Could not join: {}", message),
            ServerEvent::RoundResult {
                choices,
                scores,
                round,
            } => {
                let mine = self.me.and_then(|me| choices.get(&me));
                let theirs = choices
                    .iter()
                    .find(|(id, _)| Some(**id) != self.me)
                    .map(|(_, c)| c);
                match (mine, theirs) {
                    (Some(mine), Some(theirs)) => format!(
                        "Round {}: you {}, opponent {}. {}",
                        round,
                        mine,
                        theirs,
                        self.score_line(scores)
                    ),
                    _ => format!("Round {} played. {}", round, self.score_line(scores)),
                }
            }
            ServerEvent::GameOver { scores } => {
                format!("Game over! Final {}", self.score_line(scores).to_lowercase())
            }
            ServerEvent::PlayerDisconnected { .. } => {
                "Your opponent left. This match cannot continue.".to_string()
            }
        }
    }

    fn score_line(&self, scores: &Scores) -> String {
        let mine = self.me.and_then(|me| scores.get(&me)).copied().unwrap_or(0);
        let theirs: u32 = scores
            .iter()
            .filter(|(id, _)| Some(**id) != self.me)
            .map(|(_, s)| *s)
            .sum();
        format!("Score: you {} - opponent {}", mine, theirs)
    }
}

/// WebSocket game client
pub struct WebSocketClient {
    ws_url: String,
}

impl WebSocketClient {
    /// Create a new WebSocket client
    pub fn new(ws_url: String) -> Self {
        Self { ws_url }
    }

    /// Connect to the server and play until `quit`, EOF or the socket closes
    pub async fn connect_and_play(self) -> Result<()> {
        println!("Connecting to {}...", self.ws_url);

        let (ws_stream, _) = connect_async(&self.ws_url)
            .await
            .context("Failed to connect to WebSocket")?;

        println!("Connected! Type 'help' for commands.\n");

        let (mut write, mut read) = ws_stream.split();
        let mut tracker = MatchTracker::default();
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                msg = read.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ServerEvent>(text.as_str()) {
                            Ok(event) => {
                                tracker.observe(&event);
                                println!("{}", tracker.describe(&event));
                            }
                            Err(e) => eprintln!("Failed to parse server event: {}", e),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        println!("Server closed connection");
                        break;
                    }
                    Some(Err(e)) => {
                        eprintln!("WebSocket error: {}", e);
                        break;
                    }
                    Some(Ok(_)) => {}
                },

                line = lines.next_line() => {
                    let Some(line) = line.context("Error reading input")? else {
                        break; // EOF
                    };
                    if line.trim().is_empty() {
                        continue;
                    }

                    let command = match parse_command(&line) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("Error: {}", e);
                            continue;
                        }
                    };

                    match command {
                        Command::Quit => {
                            println!("Disconnecting...");
                            break;
                        }
                        Command::Help => {
                            println!("{}", HELP_TEXT);
                            continue;
                        }
                        Command::Join(ref code) => tracker.joining(code),
                        _ => {}
                    }

                    match tracker.event_for(&command) {
                        Ok(event) => {
                            let json = serde_json::to_string(&event)?;
                            write
                                .send(Message::text(json))
                                .await
                                .context("Failed to send command")?;
                        }
                        Err(e) => eprintln!("Error: {}", e),
                    }
                }
            }
        }

        let _ = write.close().await;

        Ok(())
    }
}
