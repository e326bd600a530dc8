// src/utils.rs
use actix_web::cookie::{ time::Duration as CookieDuration, Cookie, SameSite };
use actix_web::{ HttpRequest, HttpResponse, ResponseError };
use log::debug;
use std::fmt;
use std::net::IpAddr;
use uuid::Uuid;

pub const VISITOR_COOKIE: &str = "visitor";

#[derive(Debug)]
pub enum RequestError {
    MissingPeerIP,
    RateLimitExceeded,
    Upstream(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPeerIP => write!(f, "Failed to extract client IP"),
            Self::RateLimitExceeded => write!(f, "Rate limit exceeded"),
            Self::Upstream(e) => write!(f, "Upstream unavailable: {}", e),
        }
    }
}

impl ResponseError for RequestError {
    fn error_response(&self) -> HttpResponse {
        match self {
            Self::RateLimitExceeded => HttpResponse::TooManyRequests().body(self.to_string()),
            Self::Upstream(_) => HttpResponse::BadGateway().body(self.to_string()),
            Self::MissingPeerIP => HttpResponse::BadRequest().body(self.to_string()),
        }
    }
}

/// The visitor's address: first `X-Forwarded-For` hop, then `X-Real-IP`, then the peer.
pub fn extract_client_ip(req: &HttpRequest) -> Result<IpAddr, RequestError> {
    if let Some(forwarded_for) = req.headers().get("X-Forwarded-For") {
        if let Ok(ip_str) = forwarded_for.to_str() {
            if let Some(first_ip) = ip_str.split(',').next() {
                if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                    return Ok(ip);
                }
            }
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP") {
        if let Ok(ip) = real_ip.to_str().unwrap_or("").trim().parse::<IpAddr>() {
            debug!("Using X-Real-IP: {}", ip);
            return Ok(ip);
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip())
        .ok_or(RequestError::MissingPeerIP)
}

/// Returns the visitor id from the cookie, or a fresh one that the caller must set.
pub fn visitor_id(req: &HttpRequest) -> (String, bool) {
    match req.cookie(VISITOR_COOKIE) {
        Some(cookie) if Uuid::parse_str(cookie.value()).is_ok() => (cookie.value().to_string(), false),
        _ => (Uuid::new_v4().to_string(), true),
    }
}

pub fn visitor_cookie(id: &str) -> Cookie<'static> {
    Cookie::build(VISITOR_COOKIE, id.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::days(365))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_forwarded_for_wins() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .peer_addr("127.0.0.1:9000".parse().unwrap())
            .to_http_request();
        assert_eq!(extract_client_ip(&req).unwrap(), "203.0.113.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_falls_back_to_peer() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "garbage"))
            .peer_addr("192.0.2.4:9000".parse().unwrap())
            .to_http_request();
        assert_eq!(extract_client_ip(&req).unwrap(), "192.0.2.4".parse::<IpAddr>().unwrap());

        let req = TestRequest::default().to_http_request();
        assert!(matches!(extract_client_ip(&req), Err(RequestError::MissingPeerIP)));
    }

    #[test]
    fn test_visitor_id() {
        let req = TestRequest::default().to_http_request();
        let (id, fresh) = visitor_id(&req);
        assert!(fresh);
        assert!(Uuid::parse_str(&id).is_ok());

        let req = TestRequest::default().cookie(visitor_cookie(&id)).to_http_request();
        assert_eq!(visitor_id(&req), (id, false));

        let req = TestRequest::default().cookie(Cookie::new(VISITOR_COOKIE, "not-a-uuid")).to_http_request();
        assert!(visitor_id(&req).1);
    }
}
