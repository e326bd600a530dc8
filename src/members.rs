// src/members.rs
use std::cmp::Ordering;
use serde::{ Deserialize, Serialize };
use crate::models::member::MemberRecord;

pub const FILTER_ALL: &str = "all";
pub const NO_MATCHES: &str = "没有找到匹配的成员";

/// Online members first, then most recently seen. The sort is stable, and `lastSeen`
/// is compared as a plain string, so upstream timestamps must sort lexicographically.
pub fn sort_members(members: &mut [MemberRecord]) {
    members.sort_by(compare_members);
}

fn compare_members(a: &MemberRecord, b: &MemberRecord) -> Ordering {
    b.is_online
        .cmp(&a.is_online)
        .then_with(|| b.last_seen_key().cmp(a.last_seen_key()))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemberQuery {
    #[serde(rename = "q")]
    pub search: String,
    pub filter: Option<String>,
}

impl MemberQuery {
    fn search_term(&self) -> String {
        self.search.to_lowercase()
    }

    fn active_filter(&self) -> Option<&str> {
        self.filter
            .as_deref()
            .filter(|f| !f.is_empty() && *f != FILTER_ALL)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberView {
    /// Indices into the member list that stay visible, in list order.
    pub visible: Vec<usize>,
    pub message: Option<String>,
}

impl MemberView {
    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.binary_search(&index).is_ok()
    }
}

fn matches_search(member: &MemberRecord, term: &str) -> bool {
    member.name.to_lowercase().contains(term) ||
        member.role.to_lowercase().contains(term) ||
        member.tags.iter().any(|tag| tag.to_lowercase().contains(term))
}

fn matches_filter(member: &MemberRecord, filter: &str) -> bool {
    member.role == filter || member.has_tag(filter)
}

/// Applies the search box and the tag filter together. A member has to pass both.
pub fn apply_query(members: &[MemberRecord], query: &MemberQuery) -> MemberView {
    let term = query.search_term();
    let filter = query.active_filter();

    let visible: Vec<usize> = members
        .iter()
        .enumerate()
        .filter(|(_, m)| term.is_empty() || matches_search(m, &term))
        .filter(|(_, m)| filter.map_or(true, |f| matches_filter(m, f)))
        .map(|(i, _)| i)
        .collect();

    let message = if !term.is_empty() && visible.is_empty() {
        Some(NO_MATCHES.to_string())
    } else {
        None
    };

    MemberView { visible, message }
}

/// Every distinct role and tag, in first-seen order, for the filter buttons.
pub fn filter_values(members: &[MemberRecord]) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for member in members {
        let candidates = std::iter::once(&member.role).chain(member.tags.iter());
        for value in candidates {
            if !value.is_empty() && !values.contains(value) {
                values.push(value.clone());
            }
        }
    }
    values
}
