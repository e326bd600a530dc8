// src/main.rs
mod changelog;
mod client;
mod config;
mod guide;
mod handlers;
mod members;
mod models;
mod poller;
mod render;
mod status;
mod storage;
mod ui;
mod utils;

use actix_web::{ web, App, HttpServer };
use env_logger::Env;
use governor::RateLimiter;
use std::sync::Arc;
use crate::client::UpstreamClient;
use crate::config::Config;
use crate::handlers::{ Content, Stores, VisitLimiter };
use crate::poller::Feeds;
use crate::storage::file::FileStore;
use crate::storage::memory::MemoryStore;
use log::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env();
    let bind = config.bind();
    info!("Upstream feeds at {}, stats API at {}", config.upstream_url, config.api_base());

    let client = UpstreamClient::new(&config).map_err(|e| {
        log::error!("Failed to build HTTP client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let content = web::Data::new(Content {
        guide: guide::load_guide(&config.guide_file),
        changelog: changelog::load_changelog(&config.changelog_file),
    });

    let stores = web::Data::new(Stores {
        local: Box::new(FileStore::open(&config.preferences_file)),
        session: Box::new(MemoryStore::with_ttl(config.session_ttl())),
    });

    let visit_rate_limiter: web::Data<VisitLimiter> = web::Data::new(
        RateLimiter::keyed(config.visit_quota())
    );

    let feeds = Arc::new(Feeds::new());
    poller::start(feeds.clone(), client.clone(), &config);

    let feeds = web::Data::new(feeds);
    let client = web::Data::new(client);

    info!("Starting portal on {}", bind);
    HttpServer::new(move || {
        App::new()
            .app_data(feeds.clone())
            .app_data(client.clone())
            .app_data(content.clone())
            .app_data(stores.clone())
            .app_data(visit_rate_limiter.clone())
            .configure(handlers::routes)
    })
        .bind(&bind)?
        .run().await
}
