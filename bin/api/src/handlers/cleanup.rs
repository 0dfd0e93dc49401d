//! Manual triggers for the maintenance sweeps the sweeper runs on a timer.

use std::sync::Arc;

use animetoken_core::ApiError;
use animetoken_storage::repos;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::response::{ApiResponse, respond};
use crate::state::AppState;

#[derive(Serialize)]
pub struct CleanupResponse {
    pub deleted: u64,
}

/// POST /api/v1/cleanup/orphaned-jobs — reap pending jobs with zero items.
pub async fn orphaned_jobs(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<CleanupResponse>> {
    respond(
        async {
            let deleted =
                repos::delete_orphaned_jobs(&state.pool, state.settings.orphan_job_age_secs)
                    .await
                    .map_err(ApiError::internal)?;
            if deleted > 0 {
                tracing::info!(deleted, "orphaned mint jobs removed");
            }
            Ok(CleanupResponse { deleted })
        }
        .await,
    )
}

/// POST /api/v1/cleanup/expired-boosts
pub async fn expired_boosts(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<CleanupResponse>> {
    respond(
        async {
            let deleted = repos::delete_expired_boosts(&state.pool)
                .await
                .map_err(ApiError::internal)?;
            if deleted > 0 {
                tracing::info!(deleted, "expired listing boosts removed");
            }
            Ok(CleanupResponse { deleted })
        }
        .await,
    )
}
