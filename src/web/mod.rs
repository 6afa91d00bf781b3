//! HTTP surface for noteboard.
//!
//! Page routes answer with JSON documents describing what a template would
//! render; form submissions redirect on success the way a browser expects.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
