//! Bookmark submission handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use recollect_core::{BookmarkRecord, SubmissionRequest};

use crate::{ApiError, AppState};

/// Response envelope shared by success and error bodies.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            message: None,
        }
    }
}

/// Add a bookmark with minimal client-side data.
///
/// The server scrapes the page itself and fills in title, description,
/// preview image and media metadata.
///
/// # Returns
/// - 200 OK with `{"data": [record], "error": null, "message": null}`
/// - 400 Bad Request for malformed JSON, a missing or invalid URL, or an invalid collection id
/// - 401 Unauthorized if the access token does not resolve
/// - 403 Forbidden without update access or without write access to the collection
/// - 409 Conflict if the URL is already in the collection
/// - 500 Internal Server Error if the store fails
pub async fn add_bookmark_min_data(
    State(state): State<AppState>,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Result<Json<Envelope<Vec<BookmarkRecord>>>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let records = state.ingest.submit(request).await?;
    Ok(Json(Envelope::data(records)))
}
