// src/client.rs
use log::debug;
use reqwest::header::{ CACHE_CONTROL, HeaderValue };
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;
use crate::config::Config;
use crate::models::member::MemberRecord;
use crate::models::server::ServerRecord;
use crate::models::stats::VisitStats;
use crate::status::parse_status;

#[derive(Debug)]
pub enum FetchError {
    Network(String),
    Status(u16),
    Parse(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(e) => write!(f, "Network failure: {}", e),
            Self::Status(code) => write!(f, "Upstream returned status {}", code),
            Self::Parse(e) => write!(f, "Malformed response: {}", e),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Parse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// Talks to the site origin that serves the status feeds and to the visit-stats API.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    upstream_url: String,
    api_base: String,
}

impl UpstreamClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = reqwest::Client
            ::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            upstream_url: config.upstream_url.trim_end_matches('/').to_string(),
            api_base: config.api_base().trim_end_matches('/').to_string(),
        })
    }

    async fn get_ok(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        debug!("GET {}", url);
        let response = self.http
            .get(url)
            .header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
            .send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }
        Ok(response)
    }

    pub async fn fetch_status(&self) -> Result<Vec<ServerRecord>, FetchError> {
        let url = format!("{}/server_status.txt", self.upstream_url);
        let text = self.get_ok(&url).await?.text().await?;
        Ok(parse_status(&text))
    }

    pub async fn fetch_members(&self) -> Result<Vec<MemberRecord>, FetchError> {
        let url = format!("{}/player_data.json", self.upstream_url);
        let body = self.get_ok(&url).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Parse(e.to_string()))
    }

    pub async fn fetch_stats(&self) -> Result<VisitStats, FetchError> {
        let url = format!("{}/stats", self.api_base);
        let body = self.get_ok(&url).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Parse(e.to_string()))
    }

    /// Records one page view for `visitor_ip` and returns the updated counters.
    pub async fn record_visit(&self, visitor_ip: IpAddr) -> Result<VisitStats, FetchError> {
        let url = format!("{}/visit", self.api_base);
        debug!("POST {} for {}", url, visitor_ip);
        let response = self.http
            .post(&url)
            .header("X-Forwarded-For", visitor_ip.to_string())
            .send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Parse(e.to_string()))
    }
}
