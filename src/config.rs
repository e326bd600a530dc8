use std::env;
use std::time::Duration;
use std::num::NonZeroU32;
use std::path::PathBuf;
use governor::Quota;
use url::{ Host, Url };

pub const LOCAL_API_BASE: &str = "http://127.0.0.1:5000/api";

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,

    // Upstream feeds
    pub upstream_url: String,
    pub api_base_override: Option<String>,
    pub fetch_timeout_secs: u64,

    // Poll intervals
    pub status_poll_secs: u64,
    pub members_poll_secs: u64,
    pub stats_poll_secs: u64,

    // Visit counter rate limiting
    pub visit_period_secs: u64,
    pub visit_burst_limit: u32,

    // Local data
    pub guide_file: PathBuf,
    pub changelog_file: PathBuf,
    pub preferences_file: PathBuf,
    pub session_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            upstream_url: "http://127.0.0.1:8000".to_string(),
            api_base_override: None,
            fetch_timeout_secs: 10,
            status_poll_secs: 30,
            members_poll_secs: 60,
            stats_poll_secs: 60,
            visit_period_secs: 60,
            visit_burst_limit: 5,
            guide_file: PathBuf::from("data/guide.json"),
            changelog_file: PathBuf::from("data/changelog.json"),
            preferences_file: PathBuf::from("data/preferences.json"),
            session_ttl_secs: 1800,
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn nonzero(value: u64) -> u64 {
    value.max(1)
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: parsed("PORT", defaults.port),

            upstream_url: env::var("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            api_base_override: env::var("API_BASE").ok().filter(|v| !v.is_empty()),
            fetch_timeout_secs: nonzero(parsed("FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs)),

            status_poll_secs: nonzero(parsed("STATUS_POLL_SECS", defaults.status_poll_secs)),
            members_poll_secs: nonzero(parsed("MEMBERS_POLL_SECS", defaults.members_poll_secs)),
            stats_poll_secs: nonzero(parsed("STATS_POLL_SECS", defaults.stats_poll_secs)),

            visit_period_secs: nonzero(parsed("VISIT_PERIOD_SECS", defaults.visit_period_secs)),
            visit_burst_limit: parsed("VISIT_BURST_LIMIT", defaults.visit_burst_limit).max(1),

            guide_file: env::var("GUIDE_FILE").map(PathBuf::from).unwrap_or(defaults.guide_file),
            changelog_file: env::var("CHANGELOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.changelog_file),
            preferences_file: env::var("PREFERENCES_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.preferences_file),
            session_ttl_secs: nonzero(parsed("SESSION_TTL_SECS", defaults.session_ttl_secs)),
        }
    }

    pub fn bind(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// The stats API lives on the dev server when the upstream is local, and under
    /// `/api` on the same origin otherwise.
    pub fn api_base(&self) -> String {
        if let Some(base) = &self.api_base_override {
            return base.clone();
        }
        api_base_for(&self.upstream_url)
    }

    pub fn visit_quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.visit_burst_limit).unwrap_or(NonZeroU32::MIN);
        Quota::with_period(Duration::from_secs(self.visit_period_secs))
            .unwrap_or_else(|| Quota::per_minute(burst))
            .allow_burst(burst)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

fn is_local(upstream_url: &str) -> bool {
    match Url::parse(upstream_url) {
        Ok(url) =>
            match url.host() {
                None => true,
                Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
                Some(Host::Ipv4(ip)) => ip.is_loopback(),
                Some(Host::Ipv6(ip)) => ip.is_loopback(),
            }
        Err(_) => true,
    }
}

pub fn api_base_for(upstream_url: &str) -> String {
    if is_local(upstream_url) {
        LOCAL_API_BASE.to_string()
    } else {
        format!("{}/api", upstream_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_by_host() {
        assert_eq!(api_base_for("http://localhost:8000"), LOCAL_API_BASE);
        assert_eq!(api_base_for("http://127.0.0.1"), LOCAL_API_BASE);
        assert_eq!(api_base_for("http://[::1]:8080/"), LOCAL_API_BASE);
        assert_eq!(api_base_for("http://LOCALHOST:8000"), LOCAL_API_BASE);
        assert_eq!(api_base_for("http://user@localhost:8000/feeds"), LOCAL_API_BASE);
        assert_eq!(api_base_for(""), LOCAL_API_BASE);
        assert_eq!(api_base_for("http://localhost.nachomc.fun"), "http://localhost.nachomc.fun/api");
        assert_eq!(api_base_for("https://nachomc.fun/"), "https://nachomc.fun/api");
        assert_eq!(api_base_for("https://nachomc.fun:8443"), "https://nachomc.fun:8443/api");
    }

    #[test]
    fn test_api_base_override() {
        let config = Config {
            upstream_url: "http://localhost:8000".to_string(),
            api_base_override: Some("https://stats.example.com/api".to_string()),
            ..Config::default()
        };
        assert_eq!(config.api_base(), "https://stats.example.com/api");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.status_poll_secs, 30);
        assert_eq!(config.members_poll_secs, 60);
        assert_eq!(config.bind(), "0.0.0.0:8080");
        assert_eq!(config.visit_quota().burst_size().get(), 5);
        assert_eq!(config.session_ttl(), Duration::from_secs(1800));
    }
}
