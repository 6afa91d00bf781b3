//! Web server for noteboard.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::Config;
use crate::{Database, NoteboardError, Result};

use super::handlers::AppState;
use super::middleware::{JwtState, RateLimitState};
use super::router::{create_health_router, create_router};

/// HTTP server for the notes and news site.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// JWT state.
    jwt_state: Arc<JwtState>,
    /// Login rate limiter.
    rate_limit: Arc<RateLimitState>,
    /// Allowed CORS origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config, db: Database) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| NoteboardError::Config(format!("invalid server address: {e}")))?;

        Ok(Self {
            addr,
            jwt_state: Arc::new(
                JwtState::new(&config.web.jwt_secret).with_accounts(db.clone()),
            ),
            app_state: Arc::new(AppState::new(db, config)),
            rate_limit: Arc::new(
                RateLimitState::new(config.web.login_rate_limit)
                    .trust_proxy_headers(config.web.trust_proxy_headers),
            ),
            cors_origins: config.web.cors_origins.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn build_router(&self) -> Router {
        create_router(
            self.app_state.clone(),
            self.jwt_state.clone(),
            self.rate_limit.clone(),
            &self.cors_origins,
        )
        .merge(create_health_router())
        .layer(CompressionLayer::new())
    }

    async fn bind(&self) -> Result<(TcpListener, Router)> {
        let router = self.build_router();
        let listener = TcpListener::bind(self.addr).await?;

        self.rate_limit.clone().start_cleanup_task();
        Ok((listener, router))
    }

    /// Run the web server.
    pub async fn run(self) -> Result<()> {
        let (listener, router) = self.bind().await?;
        tracing::info!("Web server listening on http://{}", listener.local_addr()?);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
        Ok(())
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
