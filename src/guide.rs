// src/guide.rs
use std::path::Path;
use log::{ info, warn };
use serde::Serialize;
use crate::models::guide::Guide;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub visible: bool,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryView {
    pub visible: bool,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideView {
    pub categories: Vec<CategoryView>,
    pub matches: usize,
    pub stats: Option<String>,
}

impl GuideView {
    fn showing_all(guide: &Guide) -> Self {
        let categories = guide.categories
            .iter()
            .map(|category| CategoryView {
                visible: true,
                items: vec![ItemView { visible: true, highlighted: false }; category.plugins.len()],
            })
            .collect();
        Self { categories, matches: 0, stats: None }
    }
}

pub fn stats_text(matches: usize) -> String {
    if matches > 0 {
        format!("找到 {} 个匹配的插件", matches)
    } else {
        "没有找到匹配的插件".to_string()
    }
}

/// Searches plugin name, id, keywords, commands and description. An empty query
/// resets the guide to fully visible.
pub fn search_guide(guide: &Guide, query: &str) -> GuideView {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return GuideView::showing_all(guide);
    }

    let mut matches = 0;
    let categories = guide.categories
        .iter()
        .map(|category| {
            let items: Vec<ItemView> = category.plugins
                .iter()
                .map(|plugin| {
                    let hit = plugin.search_text().contains(&query);
                    ItemView { visible: hit, highlighted: hit }
                })
                .collect();
            let found = items.iter().filter(|item| item.visible).count();
            matches += found;
            CategoryView { visible: found > 0, items }
        })
        .collect();

    GuideView { categories, matches, stats: Some(stats_text(matches)) }
}

/// Loads the plugin guide. A missing or broken file yields an empty guide.
pub fn load_guide(path: &Path) -> Guide {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Could not read guide file {}: {}", path.display(), e);
            return Guide::default();
        }
    };

    match serde_json::from_str::<Guide>(&content) {
        Ok(guide) => {
            info!("Loaded guide with {} categories", guide.categories.len());
            guide
        }
        Err(e) => {
            warn!("Could not parse guide file {}: {}", path.display(), e);
            Guide::default()
        }
    }
}
