//! Custom block handlers: thin wrappers over the registry.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::custom_block::CustomBlock;
use crate::registry::{CustomBlockPatch, NewCustomBlock};
use crate::state::AppState;

/// POST /api/v1/blocks
pub async fn handle_create_block(
    State(state): State<AppState>,
    Json(req): Json<NewCustomBlock>,
) -> Result<(StatusCode, Json<CustomBlock>), AppError> {
    let block = state.blocks.add(req, state.ids.as_ref())?;
    Ok((StatusCode::CREATED, Json(block)))
}

/// GET /api/v1/blocks
pub async fn handle_list_blocks(State(state): State<AppState>) -> Json<Vec<CustomBlock>> {
    Json(state.blocks.list())
}

/// GET /api/v1/blocks/by-route/:route: the navigation path. A removed
/// block's route answers 404 so the client can redirect to a safe state
/// instead of rendering a dangling page.
pub async fn handle_get_block_by_route(
    State(state): State<AppState>,
    Path(route): Path<String>,
) -> Result<Json<CustomBlock>, AppError> {
    state
        .blocks
        .get_by_route(&route)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("custom block route '{route}'")))
}

/// PATCH /api/v1/blocks/:id
pub async fn handle_update_block(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<CustomBlockPatch>,
) -> Result<Json<CustomBlock>, AppError> {
    Ok(Json(state.blocks.update(id, patch)?))
}

/// DELETE /api/v1/blocks/:id returns the removed block. Stored items are
/// orphaned here; cleaning them up belongs to the item persistence layer.
pub async fn handle_delete_block(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomBlock>, AppError> {
    Ok(Json(state.blocks.remove(id)?))
}
