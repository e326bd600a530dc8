// src/models/member.rs
use serde::{ Deserialize, Serialize };

/// Timestamp placeholder written upstream for members never seen.
pub const UNKNOWN_TIME: &str = "未知";

/// One entry of `player_data.json`. Any field may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberRecord {
    pub name: String,
    pub role: String,
    pub is_online: bool,
    pub current_servers: Vec<String>,
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
    pub last_server: Option<String>,
    pub tags: Vec<String>,
}

impl MemberRecord {
    pub fn last_seen_key(&self) -> &str {
        self.last_seen.as_deref().unwrap_or("")
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
