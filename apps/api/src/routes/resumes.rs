//! Résumé document handlers. Deliberately thin: every mutation of an open
//! document flows through the editor session (`update` → debounce →
//! canonical), never directly into the store.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::import::import_for_slot;
use crate::models::document::ResumeDocument;
use crate::models::metadata::{sanitize_layout, LayoutGrid};
use crate::models::section::SectionSlot;
use crate::reorder::reorder;
use crate::state::AppState;
use crate::sync::autosave::SaveOutcome;
use crate::template::{self, TemplateProfile};

fn parse_slot(raw: &str) -> Result<SectionSlot, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("unknown section '{raw}'")))
}

#[derive(Deserialize)]
pub struct CreateResumeRequest {
    pub name: Option<String>,
}

/// POST /api/v1/resumes
pub async fn handle_create(
    State(state): State<AppState>,
    Json(req): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<ResumeDocument>), AppError> {
    let name = req.name.unwrap_or_else(|| "Untitled Résumé".to_string());
    let doc = state.store.create(ResumeDocument::new(name)).await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeDocument>>, AppError> {
    Ok(Json(state.store.list().await?))
}

/// GET /api/v1/resumes/:id: the open session's canonical state when the
/// document is being edited, otherwise the stored copy.
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeDocument>, AppError> {
    if let Some(doc_state) = state.sessions.state(id).await {
        return Ok(Json(doc_state.snapshot().await));
    }
    Ok(Json(state.store.load(id).await?))
}

/// PUT /api/v1/resumes/:id: bulk replace on load. For an open session this
/// swaps canonical state (buffers and timers are dropped); otherwise it
/// writes straight to the store.
pub async fn handle_replace(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(doc): Json<ResumeDocument>,
) -> Result<Json<ResumeDocument>, AppError> {
    if state.sessions.replace(id, doc.clone()).await {
        if let Some(doc_state) = state.sessions.state(id).await {
            return Ok(Json(doc_state.snapshot().await));
        }
    }
    state.store.save(id, &doc).await?;
    Ok(Json(state.store.load(id).await?))
}

/// DELETE /api/v1/resumes/:id is terminal; the editing surface closes
/// without a flush and the stored document is removed.
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.close(id, false).await;
    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/resumes/:id/sections/:slot: the sole edit path. The
/// partial lands in the session's local buffer; the debounce window
/// decides when it reaches canonical state.
pub async fn handle_update_section(
    State(state): State<AppState>,
    Path((id, slot)): Path<(Uuid, String)>,
    Json(partial): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let slot = parse_slot(&slot)?;
    let session = state.sessions.open(id).await?;
    session.update(slot, partial).await?;
    Ok((StatusCode::ACCEPTED, Json(json!({ "status": "buffered" }))))
}

#[derive(Deserialize)]
pub struct ReorderRequest {
    pub source: usize,
    pub destination: Option<usize>,
}

/// POST /api/v1/resumes/:id/sections/:slot/reorder: a splice on the
/// section's item list, fed through the same buffer/debounce pipeline as
/// any other update.
pub async fn handle_reorder(
    State(state): State<AppState>,
    Path((id, slot)): Path<(Uuid, String)>,
    Json(req): Json<ReorderRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let slot = parse_slot(&slot)?;
    let session = state.sessions.open(id).await?;

    let section = session.section_value(slot).await;
    let items = section
        .get("items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let items = reorder(items, req.source, req.destination);

    session.update(slot, json!({ "items": items })).await?;
    Ok((StatusCode::ACCEPTED, Json(json!({ "status": "buffered" }))))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub owner_id: Uuid,
}

/// POST /api/v1/resumes/:id/sections/:slot/import copies the owner's raw
/// timeline records into the section with fresh item identities, appended
/// after the existing items.
pub async fn handle_import(
    State(state): State<AppState>,
    Path((id, slot)): Path<(Uuid, String)>,
    Json(req): Json<ImportRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let slot = parse_slot(&slot)?;
    let records = state.timeline.list(slot.as_str(), req.owner_id).await?;
    let imported = import_for_slot(slot, &records, state.ids.as_ref());
    let count = imported.len();

    let session = state.sessions.open(id).await?;
    let section = session.section_value(slot).await;
    let mut items = section
        .get("items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    items.extend(imported);

    session.update(slot, json!({ "items": items })).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "status": "buffered", "imported": count })),
    ))
}

/// POST /api/v1/resumes/:id/flush: explicit best-effort save, the
/// window-close path. Never fails the request: a storage failure is
/// already surfaced through the notifier and retried on the next tick.
pub async fn handle_flush(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let outcome = state.sessions.flush(id).await;
    let status = match outcome {
        SaveOutcome::Clean => "clean",
        SaveOutcome::Saved => "saved",
        SaveOutcome::Skipped => "save-in-flight",
        SaveOutcome::Failed => "failed",
    };
    Ok(Json(json!({ "status": status })))
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePreview {
    pub profile: TemplateProfile,
    /// The document's layout grid with ids that reference no existing
    /// section or custom block route dropped.
    pub layout: LayoutGrid,
}

/// GET /api/v1/resumes/:id/template: the resolved rendering profile and
/// sanitized layout for preview. Unknown template ids fall back to the
/// default profile.
pub async fn handle_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TemplatePreview>, AppError> {
    let doc = match state.sessions.state(id).await {
        Some(doc_state) => doc_state.snapshot().await,
        None => state.store.load(id).await?,
    };

    let mut known = doc.known_layout_ids();
    known.extend(state.blocks.routes());

    Ok(Json(TemplatePreview {
        profile: template::resolve(&doc.metadata),
        layout: sanitize_layout(&doc.metadata.layout, &known),
    }))
}
