//! NFT registry endpoints: display, burn, and listing boosts.

use std::sync::Arc;

use animetoken_core::ApiError;
use animetoken_storage::feed::{ChangeOp, RowChange};
use animetoken_storage::models::{ListingBoost, Nft, NftTrait};
use animetoken_storage::repos;
use animetoken_wallet as wallet;
use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::response::{ApiResponse, respond};
use crate::state::AppState;

/// How long a paid listing boost stays active.
const BOOST_DURATION_SECS: i64 = 72 * 60 * 60;

/// An NFT row with its attributes normalized for display.
#[derive(Serialize)]
pub struct NftView {
    #[serde(flatten)]
    pub nft: Nft,
    pub traits: Vec<NftTrait>,
}

impl From<Nft> for NftView {
    fn from(nft: Nft) -> Self {
        let traits = nft.normalized_attributes();
        Self { nft, traits }
    }
}

/// GET /api/v1/nfts/:id
pub async fn get_nft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Json<ApiResponse<NftView>> {
    respond(
        async {
            repos::get_nft(&state.pool, id)
                .await
                .map_err(ApiError::internal)?
                .map(NftView::from)
                .ok_or_else(|| ApiError::NotFound(format!("nft {id}")))
        }
        .await,
    )
}

#[derive(Deserialize)]
pub struct BurnRequest {
    pub wallet_address: String,
    pub signature: String,
    pub message: String,
}

/// POST /api/v1/nfts/:id/burn — owner only, signed. Removes the registry row;
/// the on-chain burn is the wallet's business.
pub async fn burn_nft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<BurnRequest>,
) -> Json<ApiResponse<serde_json::Value>> {
    respond(burn_nft_inner(&state, id, req).await)
}

async fn burn_nft_inner(
    state: &AppState,
    id: Uuid,
    req: BurnRequest,
) -> Result<serde_json::Value, ApiError> {
    let nft = repos::get_nft(&state.pool, id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound(format!("nft {id}")))?;

    if nft.owner_wallet != req.wallet_address {
        return Err(ApiError::Ownership("nft is owned by another wallet".into()));
    }

    let timestamp = wallet::extract_timestamp(&req.message)?;
    wallet::check_freshness(timestamp, Utc::now().timestamp_millis(), wallet::LINK_FRESHNESS)?;
    wallet::verify_signature(&req.wallet_address, &req.message, &req.signature)?;

    repos::delete_nft(&state.pool, id)
        .await
        .map_err(ApiError::internal)?;

    tracing::info!(nft_id = %id, wallet = %req.wallet_address, "nft burned");

    state.feed.publish(RowChange {
        table: "nfts",
        op: ChangeOp::Delete,
        wallet: req.wallet_address,
        data: json!({ "id": id }),
    });

    Ok(json!({ "burned": true }))
}

#[derive(Deserialize)]
pub struct BoostRequest {
    pub wallet_address: String,
    pub transaction_signature: String,
}

/// POST /api/v1/nfts/:id/boost — paid visibility boost for a listed NFT.
pub async fn boost_nft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<BoostRequest>,
) -> Json<ApiResponse<ListingBoost>> {
    respond(boost_nft_inner(&state, id, req).await)
}

async fn boost_nft_inner(
    state: &AppState,
    id: Uuid,
    req: BoostRequest,
) -> Result<ListingBoost, ApiError> {
    let nft = repos::get_nft(&state.pool, id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound(format!("nft {id}")))?;

    if nft.owner_wallet != req.wallet_address {
        return Err(ApiError::Ownership("nft is owned by another wallet".into()));
    }
    if !nft.is_listed {
        return Err(ApiError::Validation("only listed nfts can be boosted".into()));
    }
    if !wallet::is_plausible_payment_signature(&req.transaction_signature) {
        return Err(ApiError::Validation(
            "transaction signature has an invalid format".into(),
        ));
    }

    let boost = repos::insert_boost(
        &state.pool,
        Uuid::new_v4(),
        id,
        &req.wallet_address,
        BOOST_DURATION_SECS,
    )
    .await
    .map_err(ApiError::internal)?;

    state.feed.publish(RowChange {
        table: "listing_boosts",
        op: ChangeOp::Insert,
        wallet: req.wallet_address,
        data: json!({ "id": boost.id, "nft_id": id, "expires_at": boost.expires_at }),
    });

    Ok(boost)
}
