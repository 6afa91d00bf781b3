//! Admin handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

use super::auth::AppState;
use crate::db::Role;
use crate::error::FieldErrors;
use crate::news::NewsRepository;
use crate::web::dto::{ApiResponse, PublishNewsRequest, PublishedResponse};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, JwtClaims};

/// Helper to check admin permission.
fn require_admin(claims: &JwtClaims) -> Result<Role, ApiError> {
    let role: Role = claims.role.parse().unwrap_or_default();
    if !role.can_access(Role::Admin) {
        return Err(ApiError::forbidden("Admin access required"));
    }
    Ok(role)
}

/// Validate every item, naming failures `items[i].field`.
fn validate_items(req: &PublishNewsRequest) -> Result<(), ApiError> {
    let mut errors = FieldErrors::from_form(req);
    for (index, item) in req.items.iter().enumerate() {
        for (field, messages) in FieldErrors::from_form(item).into_inner() {
            for message in messages {
                errors.add(format!("items[{index}].{field}"), message);
            }
        }
    }
    errors.into_result().map_err(ApiError::validation)
}

/// POST /admin/news/ - Publish news items in one batch.
pub async fn publish_news(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(req): Json<PublishNewsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PublishedResponse>>), ApiError> {
    require_admin(&claims)?;
    validate_items(&req)?;

    let items: Vec<_> = req.items.into_iter().map(|i| i.into_new_news()).collect();
    let ids = NewsRepository::new(state.db.pool())
        .bulk_create(&items)
        .await?;

    tracing::info!(count = ids.len(), admin = %claims.username, "News published");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(PublishedResponse { ids })),
    ))
}
