//! Photo/avatar/thumbnail upload, transport only. The bytes go to the
//! object-storage collaborator; the returned URL is an opaque string the
//! client stores wherever it likes (item photos, document thumbnail).

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UploadQuery {
    pub directory: Option<String>,
}

/// POST /api/v1/uploads?directory=avatars
pub async fn handle_upload(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let directory = query.directory.unwrap_or_else(|| "uploads".to_string());

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
        let url = state.storage.upload(data, &directory, None).await?;
        return Ok(Json(json!({ "url": url })));
    }

    Err(AppError::Validation(
        "multipart body must contain a 'file' field".to_string(),
    ))
}
