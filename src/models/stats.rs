// src/models/stats.rs
use serde::{ Deserialize, Serialize };

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitStats {
    pub total_visits: u64,
    pub today_visits: u64,
    pub total_users: u64,
}
