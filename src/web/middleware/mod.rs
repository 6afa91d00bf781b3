//! Middleware for the web layer.

pub mod auth;
pub mod cors;
pub mod rate_limit;
pub mod security;

pub use auth::{
    jwt_auth, login_redirect_url, AuthUser, JwtClaims, JwtState, LoginRedirect,
    OptionalAuthUser, LOGIN_URL, SESSION_COOKIE,
};
pub use cors::create_cors_layer;
pub use rate_limit::{login_rate_limit, RateLimitState};
pub use security::security_headers;
