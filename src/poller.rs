// src/poller.rs
use chrono::{ DateTime, Local };
use log::{ debug, error, info };
use parking_lot::RwLock;
use std::future::Future;
use std::sync::atomic::{ AtomicU64, Ordering };
use std::sync::Arc;
use std::time::Duration;
use crate::client::{ FetchError, UpstreamClient };
use crate::config::Config;
use crate::models::member::MemberRecord;
use crate::models::server::ServerRecord;
use crate::models::stats::VisitStats;

#[derive(Debug, Clone, PartialEq)]
pub enum FeedStatus {
    Pending,
    Fresh {
        at: DateTime<Local>,
    },
    Failed {
        message: String,
        at: DateTime<Local>,
    },
}

#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub data: Option<Arc<T>>,
    pub status: FeedStatus,
}

impl<T> Snapshot<T> {
    pub fn is_stale(&self) -> bool {
        matches!(self.status, FeedStatus::Failed { .. })
    }
}

/// One polled resource. Each fetch takes a token from `begin`; only the response for
/// the most recently issued token is applied, whatever order responses arrive in.
pub struct Feed<T> {
    name: &'static str,
    sequence: AtomicU64,
    state: RwLock<Snapshot<T>>,
}

impl<T> Feed<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            sequence: AtomicU64::new(0),
            state: RwLock::new(Snapshot {
                data: None,
                status: FeedStatus::Pending,
            }),
        }
    }

    pub fn begin(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Applies a finished fetch. Returns false when the response was superseded.
    pub fn complete(&self, token: u64, result: Result<T, FetchError>) -> bool {
        let mut state = self.state.write();
        // Checked under the write lock so a newer completion cannot interleave.
        if token != self.sequence.load(Ordering::SeqCst) {
            debug!("Discarding superseded {} response #{}", self.name, token);
            return false;
        }
        match result {
            Ok(data) => {
                state.data = Some(Arc::new(data));
                state.status = FeedStatus::Fresh { at: Local::now() };
            }
            Err(e) => {
                error!("Failed to refresh {}: {}", self.name, e);
                state.status = FeedStatus::Failed {
                    message: e.to_string(),
                    at: Local::now(),
                };
            }
        }
        true
    }

    /// Stores a value obtained outside the poll loop, superseding any fetch in flight.
    pub fn replace(&self, data: T) {
        let token = self.begin();
        self.complete(token, Ok(data));
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        let state = self.state.read();
        Snapshot {
            data: state.data.clone(),
            status: state.status.clone(),
        }
    }

    /// Runs one fetch against this feed.
    pub async fn refresh<F>(&self, fetch: F) -> bool where F: Future<Output = Result<T, FetchError>> {
        let token = self.begin();
        let result = fetch.await;
        self.complete(token, result)
    }
}

pub struct Feeds {
    pub servers: Feed<Vec<ServerRecord>>,
    pub members: Feed<Vec<MemberRecord>>,
    pub stats: Feed<VisitStats>,
}

impl Feeds {
    pub fn new() -> Self {
        Self {
            servers: Feed::new("server status"),
            members: Feed::new("member list"),
            stats: Feed::new("visit stats"),
        }
    }
}

impl Default for Feeds {
    fn default() -> Self {
        Self::new()
    }
}

pub fn start(feeds: Arc<Feeds>, client: UpstreamClient, config: &Config) {
    info!(
        "Polling status every {}s, members every {}s, stats every {}s",
        config.status_poll_secs,
        config.members_poll_secs,
        config.stats_poll_secs
    );

    spawn_poll(feeds.clone(), client.clone(), config.status_poll_secs, |feeds, client| async move {
        feeds.servers.refresh(client.fetch_status()).await;
    });

    spawn_poll(feeds.clone(), client.clone(), config.members_poll_secs, |feeds, client| async move {
        feeds.members.refresh(client.fetch_members()).await;
    });

    spawn_poll(feeds, client, config.stats_poll_secs, |feeds, client| async move {
        feeds.stats.refresh(client.fetch_stats()).await;
    });
}

/// Spawns one cycle per tick without waiting for the previous one, so a slow fetch
/// can overlap the next tick. The feed tokens decide which response is kept.
fn spawn_poll<F, Fut>(feeds: Arc<Feeds>, client: UpstreamClient, period_secs: u64, cycle: F)
    where
        F: Fn(Arc<Feeds>, UpstreamClient) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(period_secs));
        loop {
            interval.tick().await;
            tokio::spawn(cycle(feeds.clone(), client.clone()));
        }
    });
}
