pub mod changelog;
pub mod guide;
pub mod index;
pub mod members;
pub mod servers;
pub mod theme;

use actix_web::{ web, HttpResponse };
use governor::{ RateLimiter, clock::DefaultClock };
use governor::state::keyed::DefaultKeyedStateStore;
use std::net::IpAddr;
use crate::models::changelog::ChangelogEntry;
use crate::models::guide::Guide;
use crate::storage::KeyValueStore;
use crate::utils::visitor_cookie;

pub type VisitLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

/// Browser-style storage: `local` survives restarts, `session` entries expire.
pub struct Stores {
    pub local: Box<dyn KeyValueStore>,
    pub session: Box<dyn KeyValueStore>,
}

/// Static site content loaded at startup.
#[derive(Debug, Clone, Default)]
pub struct Content {
    pub guide: Guide,
    pub changelog: Vec<ChangelogEntry>,
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index::home))
        .route("/servers", web::get().to(servers::servers_fragment))
        .route("/members", web::get().to(members::members_page))
        .route("/guide", web::get().to(guide::guide_page))
        .route("/changelog", web::get().to(changelog::changelog_page))
        .route("/theme", web::post().to(theme::toggle_theme))
        .route("/api/servers", web::get().to(servers::servers_json))
        .route("/api/members", web::get().to(members::members_json))
        .route("/api/stats", web::get().to(index::stats_json));
}

/// An HTML response that also hands out the visitor cookie when it was just minted.
pub(crate) fn html_response(body: String, visitor: &str, fresh_visitor: bool) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    response.content_type("text/html; charset=utf-8");
    if fresh_visitor {
        response.cookie(visitor_cookie(visitor));
    }
    response.body(body)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Arc;
    use crate::client::UpstreamClient;
    use crate::config::Config;
    use crate::poller::Feeds;
    use crate::storage::memory::MemoryStore;

    pub struct AppData {
        pub feeds: Arc<Feeds>,
        pub stores: web::Data<Stores>,
        pub content: web::Data<Content>,
        client: web::Data<UpstreamClient>,
        limiter: web::Data<VisitLimiter>,
    }

    impl AppData {
        pub fn new() -> Self {
            Self::with_content(Content::default())
        }

        pub fn with_content(content: Content) -> Self {
            Self::build(&Config::default(), content)
        }

        pub fn with_config(config: &Config) -> Self {
            Self::build(config, Content::default())
        }

        fn build(config: &Config, content: Content) -> Self {
            Self {
                feeds: Arc::new(Feeds::new()),
                stores: web::Data::new(Stores {
                    local: Box::new(MemoryStore::new()),
                    session: Box::new(MemoryStore::new()),
                }),
                content: web::Data::new(content),
                client: web::Data::new(UpstreamClient::new(config).unwrap()),
                limiter: web::Data::new(RateLimiter::keyed(config.visit_quota())),
            }
        }
    }

    pub fn app_data(cfg: &mut web::ServiceConfig, data: &AppData) {
        cfg.app_data(web::Data::new(data.feeds.clone()))
            .app_data(data.stores.clone())
            .app_data(data.content.clone())
            .app_data(data.client.clone())
            .app_data(data.limiter.clone());
        routes(cfg);
    }
}
