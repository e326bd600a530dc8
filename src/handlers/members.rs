// src/handlers/members.rs
use actix_web::{ web, HttpRequest, HttpResponse };
use serde::Serialize;
use std::sync::Arc;
use crate::handlers::{ html_response, Stores };
use crate::members::{ apply_query, filter_values, sort_members, MemberQuery };
use crate::models::member::MemberRecord;
use crate::poller::Feeds;
use crate::render;
use crate::ui::UiState;
use crate::utils::{ visitor_id, RequestError };

fn sorted_members(feeds: &Feeds) -> Vec<MemberRecord> {
    let mut members = feeds.members
        .snapshot()
        .data
        .map(|m| m.as_ref().clone())
        .unwrap_or_default();
    sort_members(&mut members);
    members
}

pub async fn members_page(
    req: HttpRequest,
    query: web::Query<MemberQuery>,
    feeds: web::Data<Arc<Feeds>>,
    stores: web::Data<Stores>
) -> HttpResponse {
    let (visitor, fresh) = visitor_id(&req);
    let ui = UiState::load(stores.local.as_ref(), stores.session.as_ref(), &visitor, !fresh);

    let snapshot = feeds.members.snapshot();
    let members = sorted_members(&feeds);
    let view = apply_query(&members, &query);
    let filters = filter_values(&members);

    let body = format!(
        "<h2>成员列表</h2>{}",
        render::members_section(&snapshot, &members, &view, &filters, &query)
    );
    html_response(render::page("成员", ui.theme, "/members", &body), &visitor, fresh)
}

#[derive(Serialize)]
struct MembersResponse<'a> {
    members: Vec<&'a MemberRecord>,
    message: Option<String>,
}

pub async fn members_json(
    query: web::Query<MemberQuery>,
    feeds: web::Data<Arc<Feeds>>
) -> Result<HttpResponse, RequestError> {
    let snapshot = feeds.members.snapshot();
    if snapshot.data.is_none() && snapshot.is_stale() {
        return Err(RequestError::Upstream("member list not loaded".to_string()));
    }

    let members = sorted_members(&feeds);
    let view = apply_query(&members, &query);
    let response = MembersResponse {
        members: view.visible
            .iter()
            .map(|&i| &members[i])
            .collect(),
        message: view.message,
    };
    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use actix_web::{ test, App };
    use serde_json::Value;
    use crate::handlers::testing::{ app_data, AppData };
    use crate::models::member::MemberRecord;

    fn roster() -> Vec<MemberRecord> {
        serde_json
            ::from_str(
                r#"[
                {"name": "Steve", "role": "玩家", "isOnline": false, "lastSeen": "2024-01-01 10:00:00", "tags": ["建筑"]},
                {"name": "Alex", "role": "玩家", "isOnline": true, "currentServers": ["1.21生电服"], "lastSeen": "2023-01-01 10:00:00", "tags": ["玩家"]},
                {"name": "F1yCar", "role": "管理员", "isOnline": false, "lastSeen": "2024-06-01 10:00:00", "tags": ["管理"]}
            ]"#
            )
            .unwrap()
    }

    fn names(body: &Value) -> Vec<String> {
        body["members"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[actix_web::test]
    async fn test_members_sorted_and_filtered() {
        let data = AppData::new();
        data.feeds.members.replace(roster());
        let app = test::init_service(App::new().configure(|cfg| app_data(cfg, &data))).await;

        let req = test::TestRequest::get().uri("/api/members").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(names(&body), vec!["Alex", "F1yCar", "Steve"]);
        assert!(body["message"].is_null());

        let req = test::TestRequest::get().uri("/api/members?filter=%E7%8E%A9%E5%AE%B6&q=st").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(names(&body), vec!["Steve"]);

        let req = test::TestRequest::get().uri("/api/members?q=zzz").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(names(&body).is_empty());
        assert_eq!(body["message"], "没有找到匹配的成员");
    }

    #[actix_web::test]
    async fn test_members_page_hides_non_matching_cards() {
        let data = AppData::new();
        data.feeds.members.replace(roster());
        let app = test::init_service(App::new().configure(|cfg| app_data(cfg, &data))).await;

        let req = test::TestRequest::get().uri("/members?q=alex").to_request();
        let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
        assert_eq!(body.matches(r#"class="member-card""#).count(), 3);
        assert_eq!(body.matches("display: none").count(), 2);
        assert!(body.contains(r#"class="filter-tag active""#));
    }
}
