//! Identity handlers: sign-up, login and logout.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;

use crate::auth::{
    is_safe_redirect, register, verify_dummy_password, verify_password, LoginForm, SignupForm,
};
use crate::config::Config;
use crate::db::{Role, UserRepository};
use crate::error::FieldErrors;
use crate::news::{BannedWordFilter, NewsService};
use crate::notes::NoteService;
use crate::web::dto::{FormInput, FormPage, FormResponse, MessageResponse, NextQuery};
use crate::web::error::ApiError;
use crate::web::middleware::{JwtClaims, LOGIN_URL, SESSION_COOKIE};
use crate::Database;

/// Message bound to `__all__` when the credentials do not match.
pub const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Comment filter.
    pub filter: BannedWordFilter,
    /// News items per home page.
    pub page_size: i64,
    /// Maximum note slug length.
    pub slug_max_length: usize,
    /// JWT encoding key.
    pub encoding_key: EncodingKey,
    /// Session token expiry in seconds.
    pub access_token_expiry: u64,
    /// Mark the session cookie `Secure`.
    pub secure_cookie: bool,
}

impl AppState {
    /// Create application state from configuration.
    pub fn new(db: Database, config: &Config) -> Self {
        Self {
            db,
            filter: BannedWordFilter::from_config(&config.comments),
            page_size: i64::from(config.news.page_size),
            slug_max_length: config.notes.slug_max_length,
            encoding_key: EncodingKey::from_secret(config.web.jwt_secret.as_bytes()),
            access_token_expiry: config.web.jwt_expiry_secs,
            secure_cookie: config.web.secure_cookie,
        }
    }

    /// Generate a session token for a user.
    pub fn generate_access_token(
        &self,
        user_id: i64,
        username: &str,
        role: &Role,
    ) -> Result<String, ApiError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = JwtClaims {
            sub: user_id,
            username: username.to_string(),
            role: role.as_str().to_string(),
            iat: now,
            exp: now + self.access_token_expiry,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            ApiError::internal("Failed to generate token")
        })
    }

    /// Build the session cookie carrying `token`.
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookie)
            .build()
    }

    /// Note service configured for this application.
    pub fn notes(&self) -> NoteService<'_> {
        NoteService::new(&self.db).with_slug_max_length(self.slug_max_length)
    }

    /// News service configured for this application.
    pub fn news(&self) -> NewsService<'_> {
        NewsService::new(&self.db, &self.filter).with_page_size(self.page_size)
    }
}

/// GET /users/signup/ - Sign-up form.
pub async fn signup_page() -> Json<FormPage> {
    Json(FormPage {
        form: FormResponse::signup(),
    })
}

/// POST /users/signup/ - Create an account, then go to the login page.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    FormInput(form): FormInput<SignupForm>,
) -> Result<Redirect, ApiError> {
    let request = form.clean()?;

    let repo = UserRepository::new(state.db.pool());
    register(&repo, request)
        .await
        .map_err(crate::NoteboardError::from)?;

    Ok(Redirect::to(LOGIN_URL))
}

/// GET /users/login/ - Login form.
pub async fn login_page() -> Json<FormPage> {
    Json(FormPage {
        form: FormResponse::login(),
    })
}

/// POST /users/login/ - Verify credentials and start a session.
///
/// Redirects to `next` when it is a local path, otherwise to the home page.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NextQuery>,
    jar: CookieJar,
    FormInput(form): FormInput<LoginForm>,
) -> Result<Response, ApiError> {
    form.clean()?;

    let repo = UserRepository::new(state.db.pool());
    let user = match repo.get_by_username(form.username.trim()).await? {
        Some(user) => user,
        None => {
            verify_dummy_password(&form.password);
            tracing::warn!(username = %form.username, "Login failed: unknown user");
            return Err(FieldErrors::single("__all__", INVALID_LOGIN).into());
        }
    };

    if verify_password(&form.password, &user.password).is_err() {
        tracing::warn!(username = %user.username, "Login failed: bad password");
        return Err(FieldErrors::single("__all__", INVALID_LOGIN).into());
    }
    if !user.is_active {
        tracing::warn!(username = %user.username, "Login refused: account disabled");
        return Err(FieldErrors::single("__all__", INVALID_LOGIN).into());
    }

    let token = state.generate_access_token(user.id, &user.username, &user.role)?;
    if let Err(e) = repo.update_last_login(user.id).await {
        tracing::warn!("Failed to record last login: {}", e);
    }

    tracing::info!(username = %user.username, user_id = user.id, "User logged in");

    let target = query
        .next
        .filter(|next| is_safe_redirect(next))
        .unwrap_or_else(|| "/".to_string());
    let jar = jar.add(state.session_cookie(token));

    Ok((jar, Redirect::to(&target)).into_response())
}

/// GET|POST /users/logout/ - End the session.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Json(MessageResponse::new("You have been logged out.")))
}
