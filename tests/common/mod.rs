//! Test helpers for the HTTP integration tests.
//!
//! Provides an in-process server over an in-memory database plus factories
//! for users, notes, news and comments.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::Value;

use noteboard::config::Config;
use noteboard::db::{NewUser, Role, User, UserRepository};
use noteboard::news::{Comment, CommentRepository, NewComment, NewNews, News, NewsRepository};
use noteboard::notes::{NewNote, Note, NoteRepository};
use noteboard::web::handlers::AppState;
use noteboard::web::middleware::{JwtState, RateLimitState};
use noteboard::web::router::{create_health_router, create_router};
use noteboard::{hash_password, Database};

/// Password given to every factory-made user.
pub const PASSWORD: &str = "correct-horse-battery";

/// JWT secret used by the test server.
pub const JWT_SECRET: &str = "test-secret-key-for-testing-only";

/// Server plus direct handles on its state.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
    pub state: Arc<AppState>,
}

/// Create a test configuration.
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.web.jwt_secret = JWT_SECRET.to_string();
    config.web.login_rate_limit = 1000;
    config
}

/// Create a test server with an in-memory database.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(create_test_config()).await
}

/// Create a test server with a custom configuration.
pub async fn spawn_app_with(config: Config) -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let state = Arc::new(AppState::new(db.clone(), &config));
    let router = create_router(
        state.clone(),
        Arc::new(JwtState::new(&config.web.jwt_secret).with_accounts(db.clone())),
        Arc::new(
            RateLimitState::new(config.web.login_rate_limit)
                .trust_proxy_headers(config.web.trust_proxy_headers),
        ),
        &config.web.cors_origins,
    )
    .merge(create_health_router());

    let server = TestServer::new(router).expect("Failed to create test server");
    TestApp { server, db, state }
}

impl TestApp {
    /// Create a member account.
    pub async fn create_user(&self, username: &str) -> User {
        self.create_user_with_role(username, Role::Member).await
    }

    /// Create an account with the given role.
    pub async fn create_user_with_role(&self, username: &str, role: Role) -> User {
        let hash = hash_password(PASSWORD).expect("hash");
        UserRepository::new(self.db.pool())
            .create(&NewUser::new(username, hash).with_role(role))
            .await
            .expect("create user")
    }

    /// Mint a session token for `user`.
    pub fn token_for(&self, user: &User) -> String {
        self.state
            .generate_access_token(user.id, &user.username, &user.role)
            .expect("token")
    }

    /// Authorization header value for `user`.
    pub fn bearer(&self, user: &User) -> String {
        format!("Bearer {}", self.token_for(user))
    }

    pub async fn create_note(&self, author: &User, title: &str, slug: &str) -> Note {
        NoteRepository::new(self.db.pool())
            .create(&NewNote::new(title, "Text note", slug, author.id))
            .await
            .expect("create note")
    }

    pub async fn create_news(&self, title: &str, date: NaiveDate) -> News {
        NewsRepository::new(self.db.pool())
            .create(&NewNews::new(title, "Просто текст.").with_date(date))
            .await
            .expect("create news")
    }

    pub async fn create_comment(
        &self,
        news: &News,
        author: &User,
        text: &str,
        created: DateTime<Utc>,
    ) -> Comment {
        CommentRepository::new(self.db.pool())
            .create(&NewComment::new(news.id, author.id, text).with_created(created))
            .await
            .expect("create comment")
    }

    pub async fn note_count(&self) -> i64 {
        NoteRepository::new(self.db.pool()).count().await.expect("count")
    }

    pub async fn comment_count(&self) -> i64 {
        CommentRepository::new(self.db.pool())
            .count()
            .await
            .expect("count")
    }

    pub async fn note_by_slug(&self, slug: &str) -> Option<Note> {
        NoteRepository::new(self.db.pool())
            .get_by_slug(slug)
            .await
            .expect("get note")
    }

    pub async fn comment_by_id(&self, id: i64) -> Option<Comment> {
        CommentRepository::new(self.db.pool())
            .get_by_id(id)
            .await
            .expect("get comment")
    }
}

/// Today's date with `days` subtracted.
pub fn days_ago(days: i64) -> NaiveDate {
    (Utc::now() - Duration::days(days)).date_naive()
}

/// Assert a 303 redirect to `location`.
pub fn assert_redirect(response: &TestResponse, location: &str) {
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), location);
}

/// The login redirect an anonymous caller gets for `path`.
pub fn login_redirect(path: &str) -> String {
    format!("/users/login/?next={path}")
}

/// Field messages from a validation error body.
pub fn field_errors(response: &TestResponse, field: &str) -> Vec<String> {
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    body["error"]["details"][field]
        .as_array()
        .map(|messages| {
            messages
                .iter()
                .filter_map(|m| m.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
