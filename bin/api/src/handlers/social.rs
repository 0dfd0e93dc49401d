//! Social graph toggles: likes and follows.
//!
//! Every toggle is idempotent in both directions — repeating a call never
//! errors and never duplicates a row. Responses carry the authoritative
//! count so optimistic client counters can reconcile.

use std::sync::Arc;

use animetoken_core::ApiError;
use animetoken_storage::feed::{ChangeOp, RowChange};
use animetoken_storage::repos;
use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::response::{ApiResponse, respond};
use crate::state::AppState;
use crate::validate::{self, ToggleAction};

#[derive(Deserialize)]
pub struct ToggleRequest {
    pub wallet_address: String,
    pub action: String,
}

#[derive(Serialize)]
pub struct LikeResponse {
    pub liked: bool,
    pub like_count: i64,
}

/// POST /api/v1/nfts/:id/like — body action is `like` or `unlike`.
pub async fn like_nft(
    State(state): State<Arc<AppState>>,
    Path(nft_id): Path<Uuid>,
    Json(req): Json<ToggleRequest>,
) -> Json<ApiResponse<LikeResponse>> {
    respond(like_nft_inner(&state, nft_id, req).await)
}

async fn like_nft_inner(
    state: &AppState,
    nft_id: Uuid,
    req: ToggleRequest,
) -> Result<LikeResponse, ApiError> {
    let action = validate::parse_action(&req.action, "like", "unlike")?;

    repos::get_nft(&state.pool, nft_id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound(format!("nft {nft_id}")))?;

    let changed = match action {
        ToggleAction::Add => repos::like_nft(&state.pool, &req.wallet_address, nft_id).await,
        ToggleAction::Remove => repos::unlike_nft(&state.pool, &req.wallet_address, nft_id).await,
    }
    .map_err(ApiError::internal)?;

    let like_count = repos::nft_like_count(&state.pool, nft_id)
        .await
        .map_err(ApiError::internal)?;

    if changed {
        state.feed.publish(RowChange {
            table: "nft_likes",
            op: if action == ToggleAction::Add { ChangeOp::Insert } else { ChangeOp::Delete },
            wallet: req.wallet_address,
            data: json!({ "nft_id": nft_id, "like_count": like_count }),
        });
    }

    Ok(LikeResponse { liked: action == ToggleAction::Add, like_count })
}

/// POST /api/v1/collections/:id/like
pub async fn like_collection(
    State(state): State<Arc<AppState>>,
    Path(collection_id): Path<Uuid>,
    Json(req): Json<ToggleRequest>,
) -> Json<ApiResponse<LikeResponse>> {
    respond(like_collection_inner(&state, collection_id, req).await)
}

async fn like_collection_inner(
    state: &AppState,
    collection_id: Uuid,
    req: ToggleRequest,
) -> Result<LikeResponse, ApiError> {
    let action = validate::parse_action(&req.action, "like", "unlike")?;

    repos::get_collection(&state.pool, collection_id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound(format!("collection {collection_id}")))?;

    let changed = match action {
        ToggleAction::Add => {
            repos::like_collection(&state.pool, &req.wallet_address, collection_id).await
        }
        ToggleAction::Remove => {
            repos::unlike_collection(&state.pool, &req.wallet_address, collection_id).await
        }
    }
    .map_err(ApiError::internal)?;

    let like_count = repos::collection_like_count(&state.pool, collection_id)
        .await
        .map_err(ApiError::internal)?;

    if changed {
        state.feed.publish(RowChange {
            table: "collection_likes",
            op: if action == ToggleAction::Add { ChangeOp::Insert } else { ChangeOp::Delete },
            wallet: req.wallet_address,
            data: json!({ "collection_id": collection_id, "like_count": like_count }),
        });
    }

    Ok(LikeResponse { liked: action == ToggleAction::Add, like_count })
}

#[derive(Serialize)]
pub struct FollowResponse {
    pub following: bool,
    pub follower_count: i64,
}

/// POST /api/v1/creators/:wallet/follow — body action is `follow` or
/// `unfollow`.
pub async fn toggle_follow(
    State(state): State<Arc<AppState>>,
    Path(creator): Path<String>,
    Json(req): Json<ToggleRequest>,
) -> Json<ApiResponse<FollowResponse>> {
    respond(toggle_follow_inner(&state, creator, req).await)
}

async fn toggle_follow_inner(
    state: &AppState,
    creator: String,
    req: ToggleRequest,
) -> Result<FollowResponse, ApiError> {
    let action = validate::parse_action(&req.action, "follow", "unfollow")?;

    if creator == req.wallet_address {
        return Err(ApiError::Validation("you cannot follow yourself".into()));
    }

    let changed = match action {
        ToggleAction::Add => repos::follow_creator(&state.pool, &req.wallet_address, &creator).await,
        ToggleAction::Remove => {
            repos::unfollow_creator(&state.pool, &req.wallet_address, &creator).await
        }
    }
    .map_err(ApiError::internal)?;

    let follower_count = repos::follower_count(&state.pool, &creator)
        .await
        .map_err(ApiError::internal)?;

    if changed {
        state.feed.publish(RowChange {
            table: "creator_follows",
            op: if action == ToggleAction::Add { ChangeOp::Insert } else { ChangeOp::Delete },
            wallet: creator.clone(),
            data: json!({ "follower_wallet": req.wallet_address, "follower_count": follower_count }),
        });
    }

    Ok(FollowResponse { following: action == ToggleAction::Add, follower_count })
}
