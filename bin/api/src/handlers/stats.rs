//! Creator statistics.

use std::sync::Arc;

use animetoken_core::ApiError;
use animetoken_storage::models::CreatorStats;
use animetoken_storage::repos;
use axum::Json;
use axum::extract::{Path, State};

use crate::response::{ApiResponse, respond};
use crate::state::AppState;

/// GET /api/v1/creators/:wallet/stats
pub async fn get_creator_stats(
    State(state): State<Arc<AppState>>,
    Path(wallet): Path<String>,
) -> Json<ApiResponse<CreatorStats>> {
    respond(
        repos::creator_stats(&state.pool, &wallet)
            .await
            .map_err(ApiError::internal),
    )
}
