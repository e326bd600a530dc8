// src/models/server.rs
use serde::{ Deserialize, Serialize };
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerState {
    Online,
    Offline,
}

impl ServerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

/// A player count from a `current/max` line. `None` means the value could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerCount(pub Option<u32>);

impl PlayerCount {
    pub const UNKNOWN: PlayerCount = PlayerCount(None);

    pub fn parse(raw: &str) -> Self {
        PlayerCount(raw.trim().parse().ok())
    }
}

impl fmt::Display for PlayerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(n) => write!(f, "{}", n),
            None => write!(f, "?"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerRecord {
    pub name: String,
    pub address: String,
    pub version: String,
    pub players: Vec<String>,
    pub online: PlayerCount,
    pub max_players: PlayerCount,
    pub status: ServerState,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServerRecord {
    pub fn new(name: String, address: String, timestamp: String) -> Self {
        Self {
            name,
            address,
            version: String::new(),
            players: Vec::new(),
            online: PlayerCount(Some(0)),
            max_players: PlayerCount(Some(0)),
            status: ServerState::Offline,
            timestamp,
            error: None,
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == ServerState::Online
    }
}
