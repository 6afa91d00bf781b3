//! Router configuration for the web surface.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{admin, auth, news, notes, AppState};
use super::middleware::{
    create_cors_layer, jwt_auth, login_rate_limit, security_headers, JwtState, RateLimitState,
};

/// Create the main router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    rate_limit: Arc<RateLimitState>,
    cors_origins: &[String],
) -> Router {
    // News and comments
    let news_routes = Router::new()
        .route("/", get(news::home))
        .route("/news/:id/", get(news::detail).post(news::add_comment))
        .route(
            "/news/:id/edit/",
            get(news::edit_comment_page).post(news::edit_comment),
        )
        .route(
            "/news/:id/delete/",
            get(news::delete_comment_page)
                .post(news::delete_comment)
                .delete(news::delete_comment),
        );

    // Notes (authentication required on every route)
    let note_routes = Router::new()
        .route("/notes/", get(notes::list))
        .route("/notes/add/", get(notes::add_page).post(notes::add))
        .route("/notes/done/", get(notes::done))
        .route("/notes/:slug/", get(notes::detail))
        .route("/notes/:slug/edit/", get(notes::edit_page).post(notes::edit))
        .route(
            "/notes/:slug/delete/",
            get(notes::delete_page)
                .post(notes::delete)
                .delete(notes::delete),
        );

    // Identity
    let user_routes = Router::new()
        .route("/users/signup/", get(auth::signup_page).post(auth::signup))
        .route(
            "/users/login/",
            get(auth::login_page)
                .post(auth::login)
                .layer(middleware::from_fn(move |req, next| {
                    let state = rate_limit.clone();
                    login_rate_limit(state, req, next)
                })),
        )
        .route("/users/logout/", get(auth::logout).post(auth::logout));

    let admin_routes = Router::new().route("/admin/news/", post(admin::publish_news));

    Router::new()
        .merge(news_routes)
        .merge(note_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(security_headers))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::Database;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::util::ServiceExt;

    async fn router() -> Router {
        let config = Config::default();
        let db = Database::open_in_memory().await.unwrap();
        create_router(
            Arc::new(AppState::new(db, &config)),
            Arc::new(JwtState::new(&config.web.jwt_secret)),
            Arc::new(RateLimitState::new(config.web.login_rate_limit)),
            &[],
        )
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = create_health_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_static_note_routes_win_over_slug() {
        let response = router()
            .await
            .oneshot(Request::get("/notes/add/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()["location"],
            "/users/login/?next=/notes/add/"
        );
    }

    #[tokio::test]
    async fn test_security_headers_applied() {
        let response = router()
            .await
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    }
}
