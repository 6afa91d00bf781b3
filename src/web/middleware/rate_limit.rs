//! Login rate limiting.

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::{net::SocketAddr, num::NonZeroU32, sync::Arc, time::Duration};

use crate::web::error::ApiError;

/// Per-IP rate limiter for login submissions.
///
/// The client is keyed on the socket peer address. Forwarding headers are
/// read only when [`RateLimitState::trust_proxy_headers`] is set.
#[derive(Clone)]
pub struct RateLimitState {
    login_limiter: Arc<DefaultKeyedRateLimiter<String>>,
    login_rate_limit: u32,
    trust_proxy_headers: bool,
}

impl RateLimitState {
    /// Create a limiter allowing `login_rate_limit` attempts per minute per IP.
    pub fn new(login_rate_limit: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(login_rate_limit).unwrap_or(NonZeroU32::MIN));
        Self {
            login_limiter: Arc::new(RateLimiter::keyed(quota)),
            login_rate_limit,
            trust_proxy_headers: false,
        }
    }

    /// Key clients on `X-Forwarded-For` / `X-Real-IP` when present.
    pub fn trust_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }

    /// Configured attempts per minute.
    pub fn login_rate_limit(&self) -> u32 {
        self.login_rate_limit
    }

    /// Check if a login attempt from `ip` is allowed.
    pub fn check_login(&self, ip: &str) -> bool {
        self.login_limiter.check_key(&ip.to_string()).is_ok()
    }

    /// Drop limiter state for clients that are back under quota.
    pub fn cleanup(&self) {
        self.login_limiter.retain_recent();
    }

    /// Start a background task to periodically clean up old entries.
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(300)).await;
                self.cleanup();
            }
        });
    }
}

/// Client address used as the limiter key.
fn get_client_ip(req: &Request<Body>, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(ip) = forwarded_ip(req) {
            return ip;
        }
    }

    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

fn header_str<'a>(req: &'a Request<Body>, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn forwarded_ip(req: &Request<Body>) -> Option<String> {
    // Reverse proxies put the client first in the chain
    header_str(req, "X-Forwarded-For")
        .and_then(|chain| chain.split(',').next())
        .or_else(|| header_str(req, "X-Real-IP"))
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

/// Rate limiting middleware for login submissions.
///
/// Only POST requests count; viewing the login form is never limited.
pub async fn login_rate_limit(
    state: Arc<RateLimitState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if req.method() != Method::POST {
        return next.run(req).await;
    }

    let ip = get_client_ip(&req, state.trust_proxy_headers);
    if !state.check_login(&ip) {
        tracing::warn!(ip = %ip, "Login rate limit exceeded");
        return ApiError::too_many_requests("Too many login attempts. Please try again later.")
            .into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::StatusCode,
        routing::{get, post},
        Router,
    };
    use tower::util::ServiceExt;

    #[test]
    fn test_login_rate_limit() {
        let state = RateLimitState::new(3);
        assert_eq!(state.login_rate_limit(), 3);

        assert!(state.check_login("127.0.0.1"));
        assert!(state.check_login("127.0.0.1"));
        assert!(state.check_login("127.0.0.1"));
        assert!(!state.check_login("127.0.0.1"));

        assert!(state.check_login("192.168.1.1"));
    }

    #[test]
    fn test_zero_limit_still_allows_one() {
        let state = RateLimitState::new(0);
        assert!(state.check_login("127.0.0.1"));
        assert!(!state.check_login("127.0.0.1"));
    }

    fn request_from(peer: &str, forwarded_for: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(Method::POST).uri("/login");
        if let Some(ip) = forwarded_for {
            builder = builder
                .header("X-Forwarded-For", ip)
                .header("X-Real-IP", ip);
        }
        let mut req = builder.body(Body::empty()).unwrap();
        let addr: SocketAddr = format!("{peer}:40000").parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        req
    }

    #[test]
    fn test_client_ip_ignores_forwarding_headers_by_default() {
        let req = request_from("192.0.2.7", Some("203.0.113.9"));
        assert_eq!(get_client_ip(&req, false), "192.0.2.7");
        assert_eq!(get_client_ip(&req, true), "203.0.113.9");

        let req = request_from("192.0.2.7", None);
        assert_eq!(get_client_ip(&req, true), "192.0.2.7");
    }

    #[test]
    fn test_client_ip_takes_first_forwarded_hop() {
        let mut req = request_from("192.0.2.7", None);
        req.headers_mut()
            .insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());
        assert_eq!(get_client_ip(&req, true), "203.0.113.9");
    }

    #[tokio::test]
    async fn test_spoofed_headers_share_the_peer_quota() {
        let state = Arc::new(RateLimitState::new(1));
        let app = Router::new()
            .route("/login", post(|| async { "ok" }))
            .layer(axum::middleware::from_fn(move |req, next| {
                login_rate_limit(state.clone(), req, next)
            }));

        let first = app
            .clone()
            .oneshot(request_from("192.0.2.7", Some("203.0.113.1")))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let spoofed = app
            .oneshot(request_from("192.0.2.7", Some("203.0.113.2")))
            .await
            .unwrap();
        assert_eq!(spoofed.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_trusted_proxy_keys_on_forwarded_client() {
        let state = Arc::new(RateLimitState::new(1).trust_proxy_headers(true));
        let app = Router::new()
            .route("/login", post(|| async { "ok" }))
            .layer(axum::middleware::from_fn(move |req, next| {
                login_rate_limit(state.clone(), req, next)
            }));

        for client in ["203.0.113.1", "203.0.113.2"] {
            let response = app
                .clone()
                .oneshot(request_from("10.0.0.1", Some(client)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{client}");
        }
    }

    #[tokio::test]
    async fn test_middleware_limits_posts_only() {
        let state = Arc::new(RateLimitState::new(1).trust_proxy_headers(true));
        let app = Router::new()
            .route("/login", get(|| async { "form" }).post(|| async { "ok" }))
            .layer(axum::middleware::from_fn(move |req, next| {
                login_rate_limit(state.clone(), req, next)
            }));

        let post = || {
            Request::builder()
                .method(Method::POST)
                .uri("/login")
                .header("X-Real-IP", "10.0.0.1")
                .body(Body::empty())
                .unwrap()
        };
        let get_req = || {
            Request::builder()
                .uri("/login")
                .header("X-Real-IP", "10.0.0.1")
                .body(Body::empty())
                .unwrap()
        };

        assert_eq!(app.clone().oneshot(post()).await.unwrap().status(), StatusCode::OK);
        assert_eq!(
            app.clone().oneshot(post()).await.unwrap().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(app.oneshot(get_req()).await.unwrap().status(), StatusCode::OK);
    }
}
