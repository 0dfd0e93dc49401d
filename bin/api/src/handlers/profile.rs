//! Profile mutation endpoints.
//!
//! Each field follows the first-change-free / pay-to-change rule
//! independently; the unlock flags live on the profile row.

use std::sync::Arc;

use animetoken_core::ApiError;
use animetoken_storage::feed::{ChangeOp, RowChange};
use animetoken_storage::models::UserProfile;
use animetoken_storage::repos;
use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::response::{ApiResponse, respond};
use crate::state::AppState;
use crate::validate;

#[derive(Deserialize)]
pub struct SetNicknameRequest {
    pub wallet_address: String,
    pub nickname: String,
    pub transaction_signature: Option<String>,
}

/// POST /api/v1/profile/nickname
pub async fn set_nickname(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetNicknameRequest>,
) -> Json<ApiResponse<UserProfile>> {
    respond(set_nickname_inner(&state, req).await)
}

async fn set_nickname_inner(
    state: &AppState,
    req: SetNicknameRequest,
) -> Result<UserProfile, ApiError> {
    validate::validate_nickname(&req.nickname)?;

    let profile = repos::ensure_profile(&state.pool, &req.wallet_address)
        .await
        .map_err(ApiError::internal)?;

    if repos::nickname_taken(&state.pool, &req.nickname, &req.wallet_address)
        .await
        .map_err(ApiError::internal)?
    {
        return Err(ApiError::Conflict("nickname is already taken".into()));
    }

    validate::check_unlock(profile.nickname_unlocked, req.transaction_signature.as_deref())?;

    let updated = repos::set_nickname(&state.pool, &req.wallet_address, &req.nickname)
        .await
        .map_err(ApiError::internal)?;

    publish_profile_change(state, &updated, json!({ "nickname": updated.nickname }));
    Ok(updated)
}

#[derive(Deserialize)]
pub struct SetBioRequest {
    pub wallet_address: String,
    pub bio: String,
    pub transaction_signature: Option<String>,
}

/// POST /api/v1/profile/bio
pub async fn set_bio(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetBioRequest>,
) -> Json<ApiResponse<UserProfile>> {
    respond(set_bio_inner(&state, req).await)
}

async fn set_bio_inner(state: &AppState, req: SetBioRequest) -> Result<UserProfile, ApiError> {
    validate::validate_bio(&req.bio)?;

    let profile = repos::ensure_profile(&state.pool, &req.wallet_address)
        .await
        .map_err(ApiError::internal)?;

    validate::check_unlock(profile.bio_unlocked, req.transaction_signature.as_deref())?;

    let updated = repos::set_bio(&state.pool, &req.wallet_address, &req.bio)
        .await
        .map_err(ApiError::internal)?;

    publish_profile_change(state, &updated, json!({ "bio": updated.bio }));
    Ok(updated)
}

#[derive(Deserialize)]
pub struct SetPfpRequest {
    pub wallet_address: String,
    pub nft_id: Uuid,
    pub transaction_signature: Option<String>,
}

/// POST /api/v1/profile/pfp — avatar must be an NFT the caller owns.
pub async fn set_pfp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetPfpRequest>,
) -> Json<ApiResponse<UserProfile>> {
    respond(set_pfp_inner(&state, req).await)
}

async fn set_pfp_inner(state: &AppState, req: SetPfpRequest) -> Result<UserProfile, ApiError> {
    let nft = repos::get_nft(&state.pool, req.nft_id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound(format!("nft {}", req.nft_id)))?;

    if nft.owner_wallet != req.wallet_address {
        return Err(ApiError::Ownership("the avatar NFT is owned by another wallet".into()));
    }

    let profile = repos::ensure_profile(&state.pool, &req.wallet_address)
        .await
        .map_err(ApiError::internal)?;

    validate::check_unlock(profile.avatar_unlocked, req.transaction_signature.as_deref())?;

    let updated = repos::set_avatar(&state.pool, &req.wallet_address, nft.id, &nft.image_url)
        .await
        .map_err(ApiError::internal)?;

    publish_profile_change(state, &updated, json!({ "avatar_url": updated.avatar_url }));
    Ok(updated)
}

/// GET /api/v1/profile/:wallet — stored profile, or an empty default for
/// wallets that have never written one.
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(wallet): Path<String>,
) -> Json<ApiResponse<UserProfile>> {
    respond(get_profile_inner(&state, wallet).await)
}

async fn get_profile_inner(state: &AppState, wallet: String) -> Result<UserProfile, ApiError> {
    if let Some(profile) = repos::get_profile(&state.pool, &wallet)
        .await
        .map_err(ApiError::internal)?
    {
        return Ok(profile);
    }

    let now = Utc::now().naive_utc();
    Ok(UserProfile {
        wallet_address: wallet,
        nickname: None,
        bio: String::new(),
        avatar_url: String::new(),
        avatar_nft_id: None,
        profile_rank: animetoken_storage::models::ProfileRank::Default,
        trade_count: 0,
        nickname_unlocked: false,
        bio_unlocked: false,
        avatar_unlocked: false,
        created_at: now,
        updated_at: now,
    })
}

fn publish_profile_change(state: &AppState, profile: &UserProfile, data: serde_json::Value) {
    state.feed.publish(RowChange {
        table: "user_profiles",
        op: ChangeOp::Update,
        wallet: profile.wallet_address.clone(),
        data,
    });
}
