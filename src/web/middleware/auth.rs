//! Session authentication.
//!
//! The caller is identified by a signed JWT carried either in an
//! `Authorization: Bearer` header or in the session cookie. A missing,
//! invalid or expired token means an anonymous caller, and so does a token
//! whose account has been deleted or deactivated since it was issued.

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::{Database, UserRepository};

/// Name of the cookie holding the session token.
pub const SESSION_COOKIE: &str = "session";

/// Path of the login page.
pub const LOGIN_URL: &str = "/users/login/";

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID).
    pub sub: i64,
    /// Username.
    pub username: String,
    /// User role.
    pub role: String,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
    /// JWT ID (unique identifier).
    pub jti: String,
}

/// Application state for JWT authentication.
#[derive(Clone)]
pub struct JwtState {
    /// Decoding key for JWT verification.
    pub decoding_key: DecodingKey,
    /// Validation settings.
    pub validation: Validation,
    /// Account store consulted on every request, if attached.
    accounts: Option<Database>,
}

impl JwtState {
    /// Create a new JWT state from a secret key.
    pub fn new(secret: &str) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            decoding_key,
            validation,
            accounts: None,
        }
    }

    /// Check each session against the account it names.
    ///
    /// Tokens of deleted or inactive accounts are then ignored, and the role
    /// claim is replaced by the account's current role.
    pub fn with_accounts(mut self, db: Database) -> Self {
        self.accounts = Some(db);
        self
    }

    /// Decode a token, returning None if it is invalid or expired.
    pub fn verify(&self, token: &str) -> Option<JwtClaims> {
        match decode::<JwtClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("JWT validation failed: {}", e);
                None
            }
        }
    }
}

/// Build the login URL that returns to `path` afterwards.
pub fn login_redirect_url(path: &str) -> String {
    let next = urlencoding::encode(path).replace("%2F", "/");
    format!("{LOGIN_URL}?next={next}")
}

/// Rejection for protected routes: redirect to the login page.
#[derive(Debug, Clone)]
pub struct LoginRedirect {
    next: String,
}

impl LoginRedirect {
    /// Redirect to login, coming back to `next`.
    pub fn new(next: impl Into<String>) -> Self {
        Self { next: next.into() }
    }

    /// The login URL this rejection points to.
    pub fn location(&self) -> String {
        login_redirect_url(&self.next)
    }
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&self.location()).into_response()
    }
}

/// Find the session token in the request, header first.
fn session_token(parts: &Parts) -> Option<String> {
    let header_token = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|t| t.to_string());
    if header_token.is_some() {
        return header_token;
    }

    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

impl JwtState {
    /// Claims of a live session: a valid token for an active account.
    async fn session_claims(&self, token: &str) -> Option<JwtClaims> {
        let mut claims = self.verify(token)?;
        let Some(db) = &self.accounts else {
            return Some(claims);
        };

        match UserRepository::new(db.pool()).get_by_id(claims.sub).await {
            Ok(Some(user)) if user.is_active => {
                claims.role = user.role.as_str().to_string();
                Some(claims)
            }
            Ok(_) => {
                tracing::debug!(user_id = claims.sub, "Session of missing or inactive account");
                None
            }
            Err(e) => {
                tracing::warn!(user_id = claims.sub, "Session account lookup failed: {}", e);
                None
            }
        }
    }
}

/// Resolve the caller's claims, if any.
async fn resolve_claims(parts: &Parts) -> Option<JwtClaims> {
    let token = session_token(parts)?;
    let jwt_state = parts.extensions.get::<Arc<JwtState>>()?.clone();
    jwt_state.session_claims(&token).await
}

/// Extractor for authenticated users.
///
/// Anonymous callers are redirected to the login page with the requested
/// path in `next`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub JwtClaims);

impl AuthUser {
    /// The caller's user ID.
    pub fn id(&self) -> i64 {
        self.0.sub
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match resolve_claims(parts).await {
            Some(claims) => Ok(AuthUser(claims)),
            None => {
                let path = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_else(|| parts.uri.path().to_string());
                tracing::debug!(path = %path, "Anonymous access to protected route");
                Err(LoginRedirect::new(path))
            }
        }
    }
}

/// Optional authentication extractor.
///
/// Similar to AuthUser but doesn't fail if no token is provided.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<JwtClaims>);

impl OptionalAuthUser {
    /// The caller's user ID, if authenticated.
    pub fn id(&self) -> Option<i64> {
        self.0.as_ref().map(|claims| claims.sub)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuthUser(resolve_claims(parts).await))
    }
}

/// Middleware function to inject JWT state into request extensions.
pub async fn jwt_auth(
    jwt_state: Arc<JwtState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(jwt_state);
    next.run(request).await
}
