//! Secondary wallet linking.
//!
//! Linking requires an exact match against the canonical message template,
//! signed by the wallet being linked — proof the caller controls it.

use std::sync::Arc;

use animetoken_core::ApiError;
use animetoken_storage::feed::{ChangeOp, RowChange};
use animetoken_storage::models::LinkedWallet;
use animetoken_storage::repos;
use animetoken_wallet as wallet;
use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::response::{ApiResponse, respond};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LinkWalletRequest {
    pub wallet_address: String,
    pub primary_wallet: String,
    pub signature: String,
    pub message: String,
}

/// POST /api/v1/wallets/link
pub async fn link_wallet(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LinkWalletRequest>,
) -> Json<ApiResponse<LinkedWallet>> {
    respond(link_wallet_inner(&state, req).await)
}

async fn link_wallet_inner(
    state: &AppState,
    req: LinkWalletRequest,
) -> Result<LinkedWallet, ApiError> {
    if req.wallet_address == req.primary_wallet {
        return Err(ApiError::Validation("cannot link a wallet to itself".into()));
    }

    let (address, timestamp) = wallet::parse_link_message(&req.message)
        .ok_or_else(|| ApiError::Validation("message does not match the linking template".into()))?;
    if address != req.wallet_address {
        return Err(ApiError::Validation(
            "message was signed for a different wallet".into(),
        ));
    }

    wallet::check_freshness(timestamp, Utc::now().timestamp_millis(), wallet::LINK_FRESHNESS)?;
    wallet::verify_signature(&req.wallet_address, &req.message, &req.signature)?;

    if let Some(existing) = repos::get_linked_wallet(&state.pool, &req.wallet_address)
        .await
        .map_err(ApiError::internal)?
    {
        if existing.primary_wallet == req.primary_wallet {
            // Already in the desired state; idempotent success.
            return Ok(existing);
        }
        return Err(ApiError::Conflict(
            "wallet is already linked to another account".into(),
        ));
    }

    let linked = repos::link_wallet(&state.pool, &req.wallet_address, &req.primary_wallet)
        .await
        .map_err(ApiError::internal)?;

    tracing::info!(
        wallet = %req.wallet_address,
        primary = %req.primary_wallet,
        "secondary wallet linked"
    );

    state.feed.publish(RowChange {
        table: "linked_wallets",
        op: ChangeOp::Insert,
        wallet: req.primary_wallet,
        data: json!({ "wallet_address": linked.wallet_address }),
    });

    Ok(linked)
}

#[derive(Deserialize)]
pub struct UnlinkWalletRequest {
    pub wallet_address: String,
    pub primary_wallet: String,
}

#[derive(Serialize)]
pub struct UnlinkResponse {
    pub removed: bool,
}

/// POST /api/v1/wallets/unlink — unlinking an unknown wallet succeeds.
pub async fn unlink_wallet(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UnlinkWalletRequest>,
) -> Json<ApiResponse<UnlinkResponse>> {
    respond(unlink_wallet_inner(&state, req).await)
}

async fn unlink_wallet_inner(
    state: &AppState,
    req: UnlinkWalletRequest,
) -> Result<UnlinkResponse, ApiError> {
    let removed = repos::unlink_wallet(&state.pool, &req.wallet_address, &req.primary_wallet)
        .await
        .map_err(ApiError::internal)?
        > 0;

    if removed {
        state.feed.publish(RowChange {
            table: "linked_wallets",
            op: ChangeOp::Delete,
            wallet: req.primary_wallet,
            data: json!({ "wallet_address": req.wallet_address }),
        });
    }

    Ok(UnlinkResponse { removed })
}

/// GET /api/v1/users/:wallet/wallets — all secondary wallets for a primary.
pub async fn get_user_wallets(
    State(state): State<Arc<AppState>>,
    Path(primary): Path<String>,
) -> Json<ApiResponse<Vec<LinkedWallet>>> {
    respond(
        repos::get_wallets_for_primary(&state.pool, &primary)
            .await
            .map_err(ApiError::internal),
    )
}
