// src/handlers/theme.rs
use actix_web::{ http::header, web, HttpRequest, HttpResponse };
use log::debug;
use serde::Deserialize;
use crate::handlers::Stores;
use crate::ui::UiState;
use crate::utils::{ visitor_cookie, visitor_id };

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ThemeQuery {
    back: Option<String>,
}

/// Only same-site paths are followed after toggling. Browsers read `\` as `/`, so
/// `/\host` would leave the site too.
fn redirect_target(back: Option<&str>) -> &str {
    match back {
        Some(path) if is_local_path(path) => path,
        _ => "/",
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

pub async fn toggle_theme(
    req: HttpRequest,
    query: web::Query<ThemeQuery>,
    stores: web::Data<Stores>
) -> HttpResponse {
    let (visitor, fresh) = visitor_id(&req);
    let mut ui = UiState::load(stores.local.as_ref(), stores.session.as_ref(), &visitor, !fresh);
    let theme = ui.toggle_theme(stores.local.as_ref());
    debug!("Visitor {} switched to {} theme", visitor, theme.as_str());

    let mut response = HttpResponse::SeeOther();
    response.insert_header((header::LOCATION, redirect_target(query.back.as_deref())));
    if fresh {
        response.cookie(visitor_cookie(&visitor));
    }
    response.finish()
}
