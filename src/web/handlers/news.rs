//! News and comment handlers.

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Json,
};
use std::sync::Arc;

use super::auth::AppState;
use crate::auth::Operation;
use crate::news::CommentForm;
use crate::web::dto::{
    ApiResponse, CommentEditPage, CommentItem, FormInput, FormResponse, NewsDetailPage,
    NewsListItem, PageQuery, PaginatedResponse,
};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthUser, OptionalAuthUser};

/// Location of a news item's comment thread.
fn comments_url(news_id: i64) -> String {
    format!("/news/{news_id}/#comments")
}

/// GET / - News home page, newest first.
pub async fn home(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<NewsListItem>>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let result = state.news().home_page(page).await?;

    let per_page = u32::try_from(result.limit).unwrap_or(u32::MAX);
    let total = u64::try_from(result.total).unwrap_or(0);
    let has_next = result.has_more();
    let items = result.items.into_iter().map(NewsListItem::from).collect();

    Ok(Json(PaginatedResponse::new(items, page, per_page, total, has_next)))
}

/// GET /news/:id/ - News item with comments.
///
/// The comment form is included only for authenticated callers.
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(news_id): Path<i64>,
    user: OptionalAuthUser,
) -> Result<Json<NewsDetailPage>, ApiError> {
    let detail = state.news().detail(news_id).await?;
    Ok(Json(NewsDetailPage::new(detail, user.id().is_some())))
}

/// POST /news/:id/ - Submit a comment.
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Path(news_id): Path<i64>,
    user: AuthUser,
    FormInput(form): FormInput<CommentForm>,
) -> Result<Redirect, ApiError> {
    let comment = state
        .news()
        .create_comment(Some(user.id()), news_id, &form)
        .await?;
    Ok(Redirect::to(&comments_url(comment.news_id)))
}

/// GET /news/:id/edit/ - Comment edit form.
pub async fn edit_comment_page(
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<i64>,
    user: AuthUser,
) -> Result<Json<CommentEditPage>, ApiError> {
    let comment = state
        .news()
        .get_owned_comment(Some(user.id()), comment_id, Operation::Edit)
        .await?;

    Ok(Json(CommentEditPage {
        form: FormResponse::comment_for(&comment),
        comment: comment.into(),
    }))
}

/// POST /news/:id/edit/ - Update a comment's text.
pub async fn edit_comment(
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<i64>,
    user: AuthUser,
    FormInput(form): FormInput<CommentForm>,
) -> Result<Redirect, ApiError> {
    let comment = state
        .news()
        .update_comment(Some(user.id()), comment_id, &form)
        .await?;
    Ok(Redirect::to(&comments_url(comment.news_id)))
}

/// GET /news/:id/delete/ - Comment delete confirmation.
pub async fn delete_comment_page(
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<i64>,
    user: AuthUser,
) -> Result<Json<ApiResponse<CommentItem>>, ApiError> {
    let comment = state
        .news()
        .get_owned_comment(Some(user.id()), comment_id, Operation::Delete)
        .await?;
    Ok(Json(ApiResponse::new(comment.into())))
}

/// POST|DELETE /news/:id/delete/ - Delete a comment.
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<i64>,
    user: AuthUser,
) -> Result<Redirect, ApiError> {
    let comment = state
        .news()
        .delete_comment(Some(user.id()), comment_id)
        .await?;
    Ok(Redirect::to(&comments_url(comment.news_id)))
}
