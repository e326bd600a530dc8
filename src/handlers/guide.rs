// src/handlers/guide.rs
use actix_web::{ web, HttpRequest, HttpResponse };
use serde::Deserialize;
use crate::guide::search_guide;
use crate::handlers::{ html_response, Content, Stores };
use crate::render;
use crate::ui::UiState;
use crate::utils::visitor_id;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GuideQuery {
    q: String,
}

pub async fn guide_page(
    req: HttpRequest,
    query: web::Query<GuideQuery>,
    content: web::Data<Content>,
    stores: web::Data<Stores>
) -> HttpResponse {
    let (visitor, fresh) = visitor_id(&req);
    let ui = UiState::load(stores.local.as_ref(), stores.session.as_ref(), &visitor, !fresh);

    let view = search_guide(&content.guide, &query.q);
    let body = format!("<h2>插件指南</h2>{}", render::guide_section(&content.guide, &view, &query.q));
    html_response(render::page("插件指南", ui.theme, "/guide", &body), &visitor, fresh)
}
