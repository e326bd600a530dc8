// src/render.rs
use chrono::NaiveDateTime;
use crate::changelog::{ server_anchor, ChangelogSection };
use crate::guide::GuideView;
use crate::members::{ MemberQuery, MemberView, FILTER_ALL };
use crate::models::guide::Guide;
use crate::models::member::{ MemberRecord, UNKNOWN_TIME };
use crate::models::server::ServerRecord;
use crate::models::stats::VisitStats;
use crate::poller::{ FeedStatus, Snapshot };
use crate::status::NO_PLAYERS;
use crate::ui::Theme;

const INPUT_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders upstream timestamps as `YYYY/MM/DD HH:MM`. Unknown values pass through.
pub fn format_date(raw: Option<&str>) -> String {
    let raw = match raw.map(str::trim) {
        None | Some("") => return UNKNOWN_TIME.to_string(),
        Some(raw) => raw,
    };
    INPUT_FORMATS.iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.format("%Y/%m/%d %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn status_icon(online: bool) -> &'static str {
    if online {
        r#"<i class="fas fa-check-circle"></i>"#
    } else {
        r#"<i class="fas fa-times-circle"></i>"#
    }
}

pub fn server_card(server: &ServerRecord) -> String {
    let mut html = String::new();
    let name = escape_html(&server.name);
    html.push_str(&match server_anchor(&server.name) {
        Some(anchor) =>
            format!(r#"<a class="server-card {}" href="/changelog#{}">"#, server.status.as_str(), anchor),
        None => format!(r#"<div class="server-card {}">"#, server.status.as_str()),
    });
    html.push_str(
        &format!(
            r#"<h3>{} {}</h3><p class="server-address">{}</p>"#,
            name,
            status_icon(server.is_online()),
            escape_html(&server.address)
        )
    );

    if server.is_online() {
        html.push_str(
            &format!(
                r#"<p class="server-info">版本: {}</p><p class="player-count">玩家: {}/{}</p>"#,
                escape_html(&server.version),
                server.online,
                server.max_players
            )
        );
        if server.players.is_empty() {
            html.push_str(&format!("<p>{}</p>", NO_PLAYERS));
        } else {
            html.push_str(r#"<div class="players-list"><h4>在线玩家:</h4><ul>"#);
            for player in &server.players {
                html.push_str(&format!("<li>{}</li>", escape_html(player)));
            }
            html.push_str("</ul></div>");
        }
    } else {
        html.push_str(r#"<p class="error-message">服务器离线</p>"#);
        if let Some(error) = &server.error {
            html.push_str(&format!(r#"<p class="error-detail">{}</p>"#, escape_html(error)));
        }
    }

    html.push_str(&format!(r#"<p class="update-time">更新时间: {}</p>"#, escape_html(&server.timestamp)));
    html.push_str(if server_anchor(&server.name).is_some() { "</a>" } else { "</div>" });
    html
}

fn stale_notice<T>(snapshot: &Snapshot<T>) -> String {
    match &snapshot.status {
        FeedStatus::Failed { at, .. } =>
            format!(r#"<p class="stale-notice">更新失败，显示的是 {} 之前的数据</p>"#, at.format("%H:%M:%S")),
        _ => String::new(),
    }
}

/// The server grid. Falls back to a placeholder card when nothing was ever loaded.
pub fn servers_grid(snapshot: &Snapshot<Vec<ServerRecord>>) -> String {
    let mut html = String::from(r#"<div class="servers-grid">"#);
    match (&snapshot.data, &snapshot.status) {
        (Some(servers), _) => {
            html.push_str(&stale_notice(snapshot));
            for server in servers.iter() {
                html.push_str(&server_card(server));
            }
        }
        (None, FeedStatus::Failed { .. }) => {
            html.push_str(
                r#"<div class="server-card offline"><h3>错误 <i class="fas fa-times-circle"></i></h3><p class="error-message">无法获取服务器状态</p></div>"#
            );
        }
        (None, _) => html.push_str(r#"<p class="loading">正在获取服务器状态...</p>"#),
    }
    html.push_str("</div>");
    html
}

fn playing_html(member: &MemberRecord) -> String {
    if !member.is_online || member.current_servers.is_empty() {
        return String::new();
    }
    if let [only] = member.current_servers.as_slice() {
        return format!(
            r#"<p class="server-playing"><i class="fas fa-gamepad"></i> 正在游玩: <span class="highlight">{}</span></p>"#,
            escape_html(only)
        );
    }
    let servers: Vec<String> = member.current_servers
        .iter()
        .map(|s| format!(r#"<span class="highlight">{}</span>"#, escape_html(s)))
        .collect();
    format!(
        r#"<div class="server-playing"><i class="fas fa-gamepad"></i> 正在游玩多个服务器:<div class="server-list">{}</div></div>"#,
        servers.join(", ")
    )
}

pub fn member_card(member: &MemberRecord, position: usize, visible: bool) -> String {
    let mut html = String::new();
    let name = escape_html(&member.name);
    html.push_str(
        &format!(
            r#"<div class="member-card" style="animation-delay: {:.1}s{}">"#,
            (position as f64) * 0.1,
            if visible { "" } else { "; display: none" }
        )
    );
    html.push_str(
        &format!(
            r#"<div class="member-avatar"><img src="https://crafthead.net/avatar/{}" alt="{}"><div class="status-badge {}"></div></div>"#,
            name,
            name,
            if member.is_online { "online" } else { "offline" }
        )
    );
    html.push_str(
        &format!(
            r#"<div class="member-info"><h3>{}</h3><p class="member-role">{}</p>{}"#,
            name,
            escape_html(&member.role),
            playing_html(member)
        )
    );
    html.push_str(
        &format!(
            r#"<div class="member-dates"><p class="first-seen"><i class="fas fa-calendar-plus"></i> 第一次游玩: <span>{}</span></p>"#,
            escape_html(&format_date(member.first_seen.as_deref()))
        )
    );
    if !member.is_online {
        html.push_str(
            &format!(
                r#"<p class="last-seen"><i class="fas fa-clock"></i> 最近游玩: <span>{}</span><br><small class="last-seen-time">最后在线: {}</small></p>"#,
                escape_html(member.last_server.as_deref().unwrap_or(UNKNOWN_TIME)),
                escape_html(&format_date(member.last_seen.as_deref()))
            )
        );
    }
    html.push_str(r#"</div><div class="member-tags">"#);
    for tag in &member.tags {
        html.push_str(&format!(r#"<span class="tag">{}</span>"#, escape_html(tag)));
    }
    html.push_str("</div></div></div>");
    html
}

fn filter_bar(filters: &[String], query: &MemberQuery) -> String {
    let active = query.filter.as_deref().unwrap_or(FILTER_ALL);
    let mut html = String::from(r#"<form class="search-box" method="get" action="/members">"#);
    html.push_str(
        &format!(
            r#"<input type="search" name="q" value="{}" placeholder="搜索成员..."><input type="hidden" name="filter" value="{}"></form><div class="filters">"#,
            escape_html(&query.search),
            escape_html(active)
        )
    );
    let all = std::iter::once(FILTER_ALL.to_string()).chain(filters.iter().cloned());
    for value in all {
        let label = if value == FILTER_ALL { "全部" } else { value.as_str() };
        html.push_str(
            &format!(
                r#"<a class="filter-tag{}" href="/members?q={}&amp;filter={}">{}</a>"#,
                if value == active { " active" } else { "" },
                escape_html(&urlencoding::encode(&query.search)),
                escape_html(&urlencoding::encode(&value)),
                escape_html(label)
            )
        );
    }
    html.push_str("</div>");
    html
}

/// Member roster. `members` must already be sorted; `view` indexes into it.
pub fn members_section(
    snapshot: &Snapshot<Vec<MemberRecord>>,
    members: &[MemberRecord],
    view: &MemberView,
    filters: &[String],
    query: &MemberQuery
) -> String {
    let mut html = filter_bar(filters, query);
    html.push_str(r#"<div class="members-grid">"#);

    if snapshot.data.is_none() {
        if snapshot.is_stale() {
            html.push_str(
                r#"<div class="error-message"><i class="fas fa-exclamation-circle"></i><p>无法加载成员数据</p></div>"#
            );
        } else {
            html.push_str(r#"<p class="loading">正在加载成员数据...</p>"#);
        }
        html.push_str("</div>");
        return html;
    }

    html.push_str(&stale_notice(snapshot));
    for (position, member) in members.iter().enumerate() {
        html.push_str(&member_card(member, position, view.is_visible(position)));
    }
    html.push_str("</div>");
    if let Some(message) = &view.message {
        html.push_str(&format!(r#"<p class="search-stats">{}</p>"#, escape_html(message)));
    }
    html
}

pub fn guide_section(guide: &Guide, view: &GuideView, query: &str) -> String {
    let mut html = String::from(r#"<form class="guide-search" method="get" action="/guide">"#);
    html.push_str(
        &format!(
            r#"<input id="plugin-search" type="search" name="q" value="{}" placeholder="搜索插件、指令...">"#,
            escape_html(query)
        )
    );
    if !query.trim().is_empty() {
        html.push_str(r#"<a id="clear-search" href="/guide">清除</a>"#);
    }
    html.push_str("</form>");
    if let Some(stats) = &view.stats {
        let class = if view.matches > 0 { "found" } else { "empty" };
        html.push_str(&format!(r#"<p id="search-stats" class="{}">{}</p>"#, class, escape_html(stats)));
    }

    html.push_str(r#"<div id="plugins-container">"#);
    for (category, category_view) in guide.categories.iter().zip(&view.categories) {
        if !category_view.visible {
            continue;
        }
        html.push_str(&format!(r#"<section class="plugin-category"><h3>{}</h3>"#, escape_html(&category.name)));
        for (plugin, item) in category.plugins.iter().zip(&category_view.items) {
            if !item.visible {
                continue;
            }
            html.push_str(
                &format!(
                    r#"<div class="plugin-item{}"><h4>{}</h4><span class="plugin-id">{}</span>"#,
                    if item.highlighted { " search-highlight" } else { "" },
                    escape_html(&plugin.name),
                    escape_html(&plugin.id)
                )
            );
            for line in &plugin.description {
                html.push_str(&format!("<p>{}</p>", escape_html(line)));
            }
            for command in &plugin.commands {
                html.push_str(&format!("<code>{}</code>", escape_html(command)));
            }
            html.push_str("</div>");
        }
        html.push_str("</section>");
    }
    html.push_str("</div>");
    html
}

pub fn changelog_section(sections: &[ChangelogSection<'_>]) -> String {
    let mut html = String::from(r#"<div class="changelog">"#);
    for section in sections {
        html.push_str(&format!(r#"<section id="{}">"#, escape_html(section.server_id)));
        for entry in &section.entries {
            html.push_str(
                &format!(
                    r#"<article class="changelog-item visible"><h3>{}</h3><time>{}</time><ul>"#,
                    escape_html(&entry.title),
                    escape_html(&entry.date)
                )
            );
            for item in &entry.items {
                html.push_str(&format!("<li>{}</li>", escape_html(item)));
            }
            html.push_str("</ul></article>");
        }
        html.push_str("</section>");
    }
    html.push_str("</div>");
    html
}

pub fn stats_panel(snapshot: &Snapshot<VisitStats>) -> String {
    match &snapshot.data {
        Some(stats) =>
            format!(
                r#"<div class="visit-stats"><span>总访问: {}</span><span>今日访客: {}</span><span>总用户: {}</span></div>"#,
                stats.total_visits,
                stats.today_visits,
                stats.total_users
            ),
        None => r#"<div class="visit-stats"><span>访问统计暂不可用</span></div>"#.to_string(),
    }
}

pub fn splash() -> &'static str {
    r#"<div id="splash" class="splash"><img src="/image/logo.png" alt="NachoMc"></div>"#
}

pub fn announcement() -> &'static str {
    r#"<div id="announcement-modal" class="modal-overlay show"><div class="modal"><a class="close-modal" href="">&times;</a><h2>公告</h2><p>欢迎来到 NachoMc！</p><a id="join-cta" href="https://qm.qq.com/q/c5vmQFB7Ko" target="_blank">加入QQ群</a></div></div>"#
}

/// Wraps a page body with navigation and the theme toggle.
pub fn page(title: &str, theme: Theme, current_path: &str, body: &str) -> String {
    let mut nav = String::new();
    for (href, label) in [("/", "首页"), ("/members", "成员"), ("/guide", "插件指南"), ("/changelog", "更新日志")] {
        nav.push_str(
            &format!(
                r#"<a href="{}"{}>{}</a>"#,
                href,
                if href == current_path { r#" class="active""# } else { "" },
                label
            )
        );
    }
    format!(
        r#"<!DOCTYPE html><html lang="zh-CN" data-theme="{theme}"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>{title} - NachoMc</title></head><body><nav><input type="checkbox" id="nav-toggle" class="nav-toggle"><label for="nav-toggle">&#9776;</label><div class="nav-links">{nav}</div><form method="post" action="/theme?back={back}"><button class="theme-toggle" type="submit"><i class="{icon}"></i></button></form></nav><main>{body}</main></body></html>"#,
        theme = theme.as_str(),
        title = escape_html(title),
        nav = nav,
        back = urlencoding::encode(current_path),
        icon = theme.icon_class(),
        body = body
    )
}
