pub mod blocks;
pub mod health;
pub mod resumes;
pub mod uploads;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume documents
        .route(
            "/api/v1/resumes",
            post(resumes::handle_create).get(resumes::handle_list),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get)
                .put(resumes::handle_replace)
                .delete(resumes::handle_delete),
        )
        .route("/api/v1/resumes/:id/flush", post(resumes::handle_flush))
        .route("/api/v1/resumes/:id/template", get(resumes::handle_template))
        // Section editing: all mutations funnel through the edit-sync engine
        .route(
            "/api/v1/resumes/:id/sections/:slot",
            patch(resumes::handle_update_section),
        )
        .route(
            "/api/v1/resumes/:id/sections/:slot/reorder",
            post(resumes::handle_reorder),
        )
        .route(
            "/api/v1/resumes/:id/sections/:slot/import",
            post(resumes::handle_import),
        )
        // Custom blocks
        .route(
            "/api/v1/blocks",
            post(blocks::handle_create_block).get(blocks::handle_list_blocks),
        )
        .route(
            "/api/v1/blocks/by-route/:route",
            get(blocks::handle_get_block_by_route),
        )
        .route(
            "/api/v1/blocks/:id",
            patch(blocks::handle_update_block).delete(blocks::handle_delete_block),
        )
        // Uploads
        .route("/api/v1/uploads", post(uploads::handle_upload))
        .with_state(state)
}
