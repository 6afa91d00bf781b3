//! Form body extraction.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::web::error::ApiError;

/// A submitted form, accepted as `application/x-www-form-urlencoded` or JSON.
///
/// A request without a content type submits an empty form, so required
/// fields are reported as field errors rather than as a malformed request.
/// Field validation is left to the form's own `clean`.
pub struct FormInput<T>(pub T);

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false)
}

#[async_trait]
impl<S, T> FromRequest<S> for FormInput<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !req.headers().contains_key(CONTENT_TYPE) {
            return Ok(FormInput(T::default()));
        }

        if is_json(&req) {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e)))?;
            return Ok(FormInput(value));
        }

        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid form data: {}", e)))?;
        Ok(FormInput(value))
    }
}
