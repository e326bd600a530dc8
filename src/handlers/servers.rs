// src/handlers/servers.rs
use actix_web::{ web, HttpResponse };
use log::debug;
use std::sync::Arc;
use crate::poller::Feeds;
use crate::render;
use crate::utils::RequestError;

/// The server grid alone, for pages that refresh it in place.
pub async fn servers_fragment(feeds: web::Data<Arc<Feeds>>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render::servers_grid(&feeds.servers.snapshot()))
}

pub async fn servers_json(feeds: web::Data<Arc<Feeds>>) -> Result<HttpResponse, RequestError> {
    let snapshot = feeds.servers.snapshot();
    match snapshot.data {
        Some(servers) => {
            debug!("Serving {} server records", servers.len());
            Ok(HttpResponse::Ok().json(servers.as_ref()))
        }
        None if snapshot.is_stale() => Err(RequestError::Upstream("server status not loaded".to_string())),
        None => Ok(HttpResponse::Ok().json(Vec::<()>::new())),
    }
}
