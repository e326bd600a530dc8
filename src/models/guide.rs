// src/models/guide.rs
use serde::{ Deserialize, Serialize };

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginEntry {
    pub name: String,
    pub id: String,
    pub keywords: String,
    pub commands: Vec<String>,
    pub description: Vec<String>,
}

impl PluginEntry {
    /// Lowercased text the guide search matches against.
    pub fn search_text(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.name,
            self.id,
            self.keywords,
            self.commands.join(" "),
            self.description.join(" ")
        ).to_lowercase()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideCategory {
    pub name: String,
    pub plugins: Vec<PluginEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guide {
    pub categories: Vec<GuideCategory>,
}
