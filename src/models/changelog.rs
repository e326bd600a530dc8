// src/models/changelog.rs
use serde::{ Deserialize, Serialize };

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogEntry {
    pub server_id: String,
    pub title: String,
    pub date: String,
    pub items: Vec<String>,
}
