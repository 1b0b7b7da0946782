//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Port used when `PORT` is unset or unparsable
pub const DEFAULT_PORT: u16 = 3001;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Lobby actor configuration
    pub lobby: LobbyConfig,
    /// Per-socket configuration
    pub websocket: WebSocketConfig,
    /// Prometheus exporter address (exporter disabled when `None`)
    pub metrics_bind: Option<SocketAddr>,
}

/// Lobby actor configuration
#[derive(Debug, Clone)]
pub struct LobbyConfig {
    /// Depth of the lobby inbox
    pub inbox_capacity: usize,
}

/// Per-socket limits
#[derive(Debug, Clone)]
pub struct WebSocketConfig {
    /// Outbound events buffered per connection before drops
    pub client_channel_capacity: usize,
    /// Frames allowed per burst window
    pub burst_limit: usize,
    pub burst_window_secs: u64,
    /// Frames allowed per sustained window
    pub sustained_limit: usize,
    pub sustained_window_secs: u64,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            client_channel_capacity: 32,
            burst_limit: 10,
            burst_window_secs: 1,
            sustained_limit: 100,
            sustained_window_secs: 60,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `host_override` - Optional listen address override (from CLI args)
    /// * `port_override` - Optional port override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if `METRICS_BIND` is set but is not a socket address
    pub fn from_env(
        host_override: Option<IpAddr>,
        port_override: Option<u16>,
    ) -> Result<Self, ConfigError> {
        let host = host_override
            .unwrap_or_else(|| parse_env_or("HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED)));
        let port = port_override.unwrap_or_else(|| parse_env_or("PORT", DEFAULT_PORT));

        let defaults = WebSocketConfig::default();
        let websocket = WebSocketConfig {
            client_channel_capacity: parse_env_or(
                "CLIENT_CHANNEL_CAPACITY",
                defaults.client_channel_capacity,
            ),
            burst_limit: parse_env_or("WS_BURST_LIMIT", defaults.burst_limit),
            burst_window_secs: parse_env_or("WS_BURST_WINDOW_SECS", defaults.burst_window_secs),
            sustained_limit: parse_env_or("WS_SUSTAINED_LIMIT", defaults.sustained_limit),
            sustained_window_secs: parse_env_or(
                "WS_SUSTAINED_WINDOW_SECS",
                defaults.sustained_window_secs,
            ),
        };

        let lobby = LobbyConfig {
            inbox_capacity: parse_env_or(
                "LOBBY_INBOX_CAPACITY",
                prisoners_dilemma::lobby::actor::DEFAULT_INBOX_CAPACITY,
            ),
        };

        let metrics_bind = match std::env::var("METRICS_BIND") {
            Ok(raw) if !raw.trim().is_empty() => {
                Some(raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    var: "METRICS_BIND".to_string(),
                    reason: format!("'{}' is not an IP:PORT address", raw),
                })?)
            }
            _ => None,
        };

        Ok(ServerConfig {
            bind: SocketAddr::new(host, port),
            lobby,
            websocket,
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_zero = [
            ("LOBBY_INBOX_CAPACITY", self.lobby.inbox_capacity as u64),
            (
                "CLIENT_CHANNEL_CAPACITY",
                self.websocket.client_channel_capacity as u64,
            ),
            ("WS_BURST_LIMIT", self.websocket.burst_limit as u64),
            ("WS_BURST_WINDOW_SECS", self.websocket.burst_window_secs),
            ("WS_SUSTAINED_LIMIT", self.websocket.sustained_limit as u64),
            (
                "WS_SUSTAINED_WINDOW_SECS",
                self.websocket.sustained_window_secs,
            ),
        ];

        if let Some((var, _)) = non_zero.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Invalid {
                var: var.to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.websocket.sustained_limit < self.websocket.burst_limit {
            return Err(ConfigError::Invalid {
                var: "WS_SUSTAINED_LIMIT".to_string(),
                reason: format!(
                    "Must be at least the burst limit ({})",
                    self.websocket.burst_limit
                ),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
