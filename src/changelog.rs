// src/changelog.rs
use std::path::Path;
use log::{ info, warn };
use crate::models::changelog::ChangelogEntry;

/// Anchor ids on the changelog page, keyed by server display name.
const SERVER_ANCHORS: &[(&str, &str)] = &[
    ("香草纪元整合包", "server-vefc"),
    ("1.21.4FB原版", "server-fb214"),
    ("1.21生电服", "server-fb21"),
    ("1.20.1空岛", "server-skyblock"),
];

pub fn server_anchor(server_name: &str) -> Option<&'static str> {
    SERVER_ANCHORS
        .iter()
        .find(|(name, _)| *name == server_name)
        .map(|(_, anchor)| *anchor)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogSection<'a> {
    pub server_id: &'a str,
    pub entries: Vec<&'a ChangelogEntry>,
}

/// Groups entries by server anchor, keeping the order in which anchors first appear.
pub fn group_by_server(entries: &[ChangelogEntry]) -> Vec<ChangelogSection<'_>> {
    let mut sections: Vec<ChangelogSection<'_>> = Vec::new();
    for entry in entries {
        match sections.iter_mut().find(|s| s.server_id == entry.server_id) {
            Some(section) => section.entries.push(entry),
            None =>
                sections.push(ChangelogSection {
                    server_id: &entry.server_id,
                    entries: vec![entry],
                }),
        }
    }
    sections
}

pub fn load_changelog(path: &Path) -> Vec<ChangelogEntry> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Could not read changelog file {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<ChangelogEntry>>(&content) {
        Ok(entries) => {
            info!("Loaded {} changelog entries", entries.len());
            entries
        }
        Err(e) => {
            warn!("Could not parse changelog file {}: {}", path.display(), e);
            Vec::new()
        }
    }
}
