//! Mint job queue endpoints.

use std::sync::Arc;

use animetoken_core::ApiError;
use animetoken_mintq as mintq;
use animetoken_storage::models::{MintJob, MintJobItem};
use animetoken_storage::repos;
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::response::{ApiResponse, respond};
use crate::state::AppState;

/// POST /api/v1/mint-jobs — queue a new mint request.
pub async fn create_mint_job(
    State(state): State<Arc<AppState>>,
    Json(req): Json<mintq::CreateMintJobRequest>,
) -> Json<ApiResponse<mintq::MintJobReceipt>> {
    respond(mintq::create_mint_job(&state.pool, &state.feed, &state.settings, &req).await)
}

/// A job together with its items and the derived progress view.
#[derive(Serialize)]
pub struct JobView {
    pub job: MintJob,
    pub items: Vec<MintJobItem>,
    pub progress: mintq::JobProgress,
}

/// GET /api/v1/mint-jobs/:id — job, items, and derived progress.
pub async fn get_mint_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Json<ApiResponse<JobView>> {
    respond(get_mint_job_inner(&state, id).await)
}

async fn get_mint_job_inner(state: &AppState, id: Uuid) -> Result<JobView, ApiError> {
    let job = repos::get_mint_job(&state.pool, id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound(format!("mint job {id}")))?;
    let items = repos::get_mint_job_items(&state.pool, id)
        .await
        .map_err(ApiError::internal)?;
    let progress = mintq::job_progress(&job, &items);
    Ok(JobView { job, items, progress })
}

#[derive(Deserialize)]
pub struct ListParams {
    limit: Option<i64>,
}

/// GET /api/v1/wallets/:address/mint-jobs — recent jobs for a wallet.
pub async fn list_wallet_jobs(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
    Query(params): Query<ListParams>,
) -> Json<ApiResponse<Vec<MintJob>>> {
    let limit = params.limit.unwrap_or(50).clamp(1, 200);
    respond(
        repos::get_mint_jobs_for_wallet(&state.pool, &address, limit)
            .await
            .map_err(ApiError::internal),
    )
}

#[derive(Deserialize)]
pub struct CancelRequest {
    pub wallet_address: String,
}

/// POST /api/v1/mint-jobs/:id/cancel — cancel a still-pending job.
pub async fn cancel_mint_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<CancelRequest>,
) -> Json<ApiResponse<MintJob>> {
    respond(mintq::cancel_mint_job(&state.pool, &state.feed, id, &req.wallet_address).await)
}
