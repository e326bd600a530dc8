// src/ui.rs
use log::warn;
use crate::storage::KeyValueStore;

pub const THEME_KEY: &str = "theme";
/// Bump the suffix when a new announcement should be shown to everyone again.
pub const ANNOUNCEMENT_KEY: &str = "announcement_v1";
pub const SPLASH_KEY: &str = "splashShown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Icon shown on the toggle button: a sun while dark, a moon while light.
    pub fn icon_class(&self) -> &'static str {
        match self {
            Self::Dark => "fas fa-sun",
            Self::Light => "fas fa-moon",
        }
    }
}

/// Per-visitor presentation state, read from and written back to the injected stores.
///
/// Visitors that have not sent the cookie back yet only get session entries, which
/// expire. Their announcement flag moves to `local` on the first returning request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub visitor: String,
    pub theme: Theme,
    pub announcement_seen: bool,
    pub splash_shown: bool,
    pub returning: bool,
}

impl UiState {
    pub fn load(
        local: &dyn KeyValueStore,
        session: &dyn KeyValueStore,
        visitor: &str,
        returning: bool
    ) -> Self {
        let mut announcement_seen = local.get(visitor, ANNOUNCEMENT_KEY).is_some();
        if !announcement_seen && session.get(visitor, ANNOUNCEMENT_KEY).is_some() {
            announcement_seen = true;
            if returning {
                if let Err(e) = local.set(visitor, ANNOUNCEMENT_KEY, "true") {
                    warn!("Failed to record announcement for {}: {}", visitor, e);
                }
            }
        }
        Self {
            visitor: visitor.to_string(),
            theme: local
                .get(visitor, THEME_KEY)
                .and_then(|t| Theme::parse(&t))
                .unwrap_or_default(),
            announcement_seen,
            splash_shown: session.get(visitor, SPLASH_KEY).is_some(),
            returning,
        }
    }

    pub fn toggle_theme(&mut self, local: &dyn KeyValueStore) -> Theme {
        self.theme = self.theme.toggled();
        if let Err(e) = local.set(&self.visitor, THEME_KEY, self.theme.as_str()) {
            warn!("Failed to persist theme for {}: {}", self.visitor, e);
        }
        self.theme
    }

    /// Returns true the first time the announcement should be shown, and records it.
    pub fn take_announcement(&mut self, local: &dyn KeyValueStore, session: &dyn KeyValueStore) -> bool {
        if self.announcement_seen {
            return false;
        }
        self.announcement_seen = true;
        let store = if self.returning { local } else { session };
        if let Err(e) = store.set(&self.visitor, ANNOUNCEMENT_KEY, "true") {
            warn!("Failed to record announcement for {}: {}", self.visitor, e);
        }
        true
    }

    /// Returns true once per session.
    pub fn take_splash(&mut self, session: &dyn KeyValueStore) -> bool {
        if self.splash_shown {
            return false;
        }
        self.splash_shown = true;
        if let Err(e) = session.set(&self.visitor, SPLASH_KEY, "true") {
            warn!("Failed to record splash for {}: {}", self.visitor, e);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;

    #[test]
    fn test_defaults_for_new_visitor() {
        let local = MemoryStore::new();
        let session = MemoryStore::new();
        let state = UiState::load(&local, &session, "v", true);
        assert_eq!(state.theme, Theme::Light);
        assert!(!state.announcement_seen);
        assert!(!state.splash_shown);
    }

    #[test]
    fn test_theme_toggle_persists() {
        let local = MemoryStore::new();
        let session = MemoryStore::new();

        let mut state = UiState::load(&local, &session, "v", true);
        assert_eq!(state.toggle_theme(&local), Theme::Dark);
        assert_eq!(local.get("v", THEME_KEY).as_deref(), Some("dark"));

        let mut state2 = UiState::load(&local, &session, "v", true);
        assert_eq!(state2.theme, Theme::Dark);
        assert_eq!(state2.theme.icon_class(), "fas fa-sun");
        assert_eq!(state2.toggle_theme(&local), Theme::Light);
        state.theme = Theme::Light;
        assert_eq!(UiState::load(&local, &session, "v", true), state);
    }

    #[test]
    fn test_unknown_theme_value_ignored() {
        let local = MemoryStore::new();
        let session = MemoryStore::new();
        local.set("v", THEME_KEY, "sepia").unwrap();
        assert_eq!(UiState::load(&local, &session, "v", true).theme, Theme::Light);
    }

    #[test]
    fn test_announcement_and_splash_shown_once() {
        let local = MemoryStore::new();
        let session = MemoryStore::new();

        let mut state = UiState::load(&local, &session, "v", true);
        assert!(state.take_announcement(&local, &session));
        assert!(state.take_splash(&session));
        assert!(!state.take_announcement(&local, &session));
        assert!(!state.take_splash(&session));

        let mut reloaded = UiState::load(&local, &session, "v", true);
        assert!(!reloaded.take_announcement(&local, &session));
        assert!(!reloaded.take_splash(&session));

        // A fresh session shows the splash again but not the announcement.
        let new_session = MemoryStore::new();
        let mut next_visit = UiState::load(&local, &new_session, "v", true);
        assert!(next_visit.take_splash(&new_session));
        assert!(!next_visit.take_announcement(&local, &new_session));
    }

    #[test]
    fn test_new_visitor_flags_stay_in_session() {
        let local = MemoryStore::new();
        let session = MemoryStore::new();

        let mut first = UiState::load(&local, &session, "v", false);
        assert!(first.take_announcement(&local, &session));
        assert!(first.take_splash(&session));
        assert_eq!(local.get("v", ANNOUNCEMENT_KEY), None);
        assert_eq!(session.get("v", ANNOUNCEMENT_KEY).as_deref(), Some("true"));

        // Coming back with the cookie moves the flag to local storage.
        let mut back = UiState::load(&local, &session, "v", true);
        assert!(back.announcement_seen);
        assert!(!back.take_announcement(&local, &session));
        assert_eq!(local.get("v", ANNOUNCEMENT_KEY).as_deref(), Some("true"));
    }
}
