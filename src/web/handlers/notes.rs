//! Note handlers. Every route needs a logged-in caller.

use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};
use std::sync::Arc;

use super::auth::AppState;
use crate::auth::Operation;
use crate::notes::NoteForm;
use crate::web::dto::{
    ApiResponse, FormInput, FormPage, FormResponse, MessageResponse, NoteEditPage, NoteResponse,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

/// Where add, edit and delete land on success.
pub const NOTES_DONE_URL: &str = "/notes/done/";

/// GET /notes/ - The caller's notes.
pub async fn list(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<ApiResponse<Vec<NoteResponse>>>, ApiError> {
    let notes = state.notes().list(user.id()).await?;
    Ok(Json(ApiResponse::new(
        notes.into_iter().map(NoteResponse::from).collect(),
    )))
}

/// GET /notes/add/ - Empty note form.
pub async fn add_page(_user: AuthUser) -> Json<FormPage> {
    Json(FormPage {
        form: FormResponse::note(),
    })
}

/// POST /notes/add/ - Create a note.
pub async fn add(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    FormInput(form): FormInput<NoteForm>,
) -> Result<Redirect, ApiError> {
    state.notes().create(user.id(), &form).await?;
    Ok(Redirect::to(NOTES_DONE_URL))
}

/// GET /notes/done/ - Success page.
pub async fn done(_user: AuthUser) -> Json<MessageResponse> {
    Json(MessageResponse::new("Done."))
}

/// GET /notes/:slug/ - Note detail.
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    user: AuthUser,
) -> Result<Json<ApiResponse<NoteResponse>>, ApiError> {
    let note = state
        .notes()
        .get_owned(Some(user.id()), &slug, Operation::View)
        .await?;
    Ok(Json(ApiResponse::new(note.into())))
}

/// GET /notes/:slug/edit/ - Prefilled note form.
pub async fn edit_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    user: AuthUser,
) -> Result<Json<NoteEditPage>, ApiError> {
    let note = state
        .notes()
        .get_owned(Some(user.id()), &slug, Operation::Edit)
        .await?;

    Ok(Json(NoteEditPage {
        form: FormResponse::note_for(&note),
        note: note.into(),
    }))
}

/// POST /notes/:slug/edit/ - Update a note.
pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    user: AuthUser,
    FormInput(form): FormInput<NoteForm>,
) -> Result<Redirect, ApiError> {
    state.notes().update(Some(user.id()), &slug, &form).await?;
    Ok(Redirect::to(NOTES_DONE_URL))
}

/// GET /notes/:slug/delete/ - Delete confirmation.
pub async fn delete_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    user: AuthUser,
) -> Result<Json<ApiResponse<NoteResponse>>, ApiError> {
    let note = state
        .notes()
        .get_owned(Some(user.id()), &slug, Operation::Delete)
        .await?;
    Ok(Json(ApiResponse::new(note.into())))
}

/// POST|DELETE /notes/:slug/delete/ - Delete a note.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    user: AuthUser,
) -> Result<Redirect, ApiError> {
    state.notes().delete(Some(user.id()), &slug).await?;
    Ok(Redirect::to(NOTES_DONE_URL))
}
