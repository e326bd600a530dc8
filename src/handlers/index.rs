// src/handlers/index.rs
use actix_web::{ web, HttpRequest, HttpResponse };
use log::{ debug, warn };
use std::sync::Arc;
use crate::client::UpstreamClient;
use crate::handlers::{ html_response, Stores, VisitLimiter };
use crate::poller::Feeds;
use crate::render;
use crate::ui::UiState;
use crate::utils::{ extract_client_ip, visitor_id, RequestError };

pub async fn home(
    req: HttpRequest,
    feeds: web::Data<Arc<Feeds>>,
    stores: web::Data<Stores>,
    client: web::Data<UpstreamClient>,
    rate_limiter: web::Data<VisitLimiter>
) -> HttpResponse {
    let (visitor, fresh) = visitor_id(&req);
    let mut ui = UiState::load(stores.local.as_ref(), stores.session.as_ref(), &visitor, !fresh);

    record_visit(&req, &feeds, &client, &rate_limiter);

    let mut body = String::new();
    if ui.take_splash(stores.session.as_ref()) {
        body.push_str(render::splash());
    }
    if ui.take_announcement(stores.local.as_ref(), stores.session.as_ref()) {
        body.push_str(render::announcement());
    }
    body.push_str("<h2>服务器状态</h2>");
    body.push_str(&render::servers_grid(&feeds.servers.snapshot()));
    body.push_str(&render::stats_panel(&feeds.stats.snapshot()));

    html_response(render::page("首页", ui.theme, "/", &body), &visitor, fresh)
}

/// Counts the page view upstream in the background. The reply becomes the new stats.
fn record_visit(req: &HttpRequest, feeds: &Arc<Feeds>, client: &UpstreamClient, rate_limiter: &VisitLimiter) {
    let ip = match extract_client_ip(req) {
        Ok(ip) => ip,
        Err(e) => {
            warn!("Not counting visit: {}", e);
            return;
        }
    };
    if rate_limiter.check_key(&ip).is_err() {
        debug!("Visit rate limit hit for {}", ip);
        return;
    }

    let feeds = feeds.clone();
    let client = client.clone();
    actix_web::rt::spawn(async move {
        match client.record_visit(ip).await {
            Ok(stats) => feeds.stats.replace(stats),
            Err(e) => warn!("Failed to record visit for {}: {}", ip, e),
        }
    });
}

pub async fn stats_json(feeds: web::Data<Arc<Feeds>>) -> Result<HttpResponse, RequestError> {
    let snapshot = feeds.stats.snapshot();
    match snapshot.data {
        Some(stats) => Ok(HttpResponse::Ok().json(*stats)),
        None if snapshot.is_stale() => Err(RequestError::Upstream("visit stats not loaded".to_string())),
        None => Ok(HttpResponse::Ok().json(crate::models::stats::VisitStats::default())),
    }
}
