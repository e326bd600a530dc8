// src/handlers/changelog.rs
use actix_web::{ web, HttpRequest, HttpResponse };
use crate::changelog::group_by_server;
use crate::handlers::{ html_response, Content, Stores };
use crate::render;
use crate::ui::UiState;
use crate::utils::visitor_id;

pub async fn changelog_page(
    req: HttpRequest,
    content: web::Data<Content>,
    stores: web::Data<Stores>
) -> HttpResponse {
    let (visitor, fresh) = visitor_id(&req);
    let ui = UiState::load(stores.local.as_ref(), stores.session.as_ref(), &visitor, !fresh);

    let sections = group_by_server(&content.changelog);
    let body = format!("<h2>更新日志</h2>{}", render::changelog_section(&sections));
    html_response(render::page("更新日志", ui.theme, "/changelog", &body), &visitor, fresh)
}
