//! Collection registry endpoints.

use std::sync::Arc;

use animetoken_core::ApiError;
use animetoken_storage::feed::{ChangeOp, RowChange};
use animetoken_storage::models::{Collection, CollectionPatch, NewCollection};
use animetoken_storage::repos;
use animetoken_wallet as wallet;
use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::response::{ApiResponse, respond};
use crate::state::AppState;

/// A collection row plus its computed listing eligibility.
#[derive(Serialize)]
pub struct CollectionView {
    #[serde(flatten)]
    pub collection: Collection,
    pub is_listed: bool,
}

impl From<Collection> for CollectionView {
    fn from(collection: Collection) -> Self {
        let is_listed = collection.is_listable();
        Self { collection, is_listed }
    }
}

#[derive(Deserialize)]
pub struct CreateCollectionRequest {
    pub creator_wallet: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub mint_price: Decimal,
    #[serde(default)]
    pub royalty_percentage: Decimal,
    pub max_supply: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_live: bool,
}

fn default_true() -> bool {
    true
}

/// POST /api/v1/collections
pub async fn create_collection(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCollectionRequest>,
) -> Json<ApiResponse<CollectionView>> {
    respond(create_collection_inner(&state, req).await)
}

async fn create_collection_inner(
    state: &AppState,
    req: CreateCollectionRequest,
) -> Result<CollectionView, ApiError> {
    if req.name.trim().is_empty() || req.name.chars().count() > 100 {
        return Err(ApiError::Validation("name must be 1-100 characters".into()));
    }
    if req.max_supply <= 0 {
        return Err(ApiError::Validation("max_supply must be positive".into()));
    }
    if req.mint_price < Decimal::ZERO {
        return Err(ApiError::Validation("mint_price cannot be negative".into()));
    }
    if req.royalty_percentage < Decimal::ZERO || req.royalty_percentage > Decimal::from(100) {
        return Err(ApiError::Validation("royalty_percentage must be 0-100".into()));
    }

    let collection = repos::insert_collection(
        &state.pool,
        &NewCollection {
            id: Uuid::new_v4(),
            creator_wallet: req.creator_wallet.clone(),
            name: req.name,
            description: req.description,
            category: req.category,
            image_url: req.image_url,
            mint_price: req.mint_price,
            royalty_percentage: req.royalty_percentage,
            max_supply: req.max_supply,
            is_active: req.is_active,
            is_live: req.is_live,
        },
    )
    .await
    .map_err(ApiError::internal)?;

    state.feed.publish(RowChange {
        table: "collections",
        op: ChangeOp::Insert,
        wallet: req.creator_wallet,
        data: json!({ "id": collection.id, "name": collection.name }),
    });

    Ok(collection.into())
}

/// GET /api/v1/collections/:id
pub async fn get_collection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Json<ApiResponse<CollectionView>> {
    respond(
        async {
            repos::get_collection(&state.pool, id)
                .await
                .map_err(ApiError::internal)?
                .map(CollectionView::from)
                .ok_or_else(|| ApiError::NotFound(format!("collection {id}")))
        }
        .await,
    )
}

#[derive(Deserialize)]
pub struct UpdateCollectionRequest {
    pub wallet_address: String,
    #[serde(flatten)]
    pub patch: CollectionPatch,
}

/// PATCH /api/v1/collections/:id — creator only; absent fields are kept.
pub async fn update_collection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCollectionRequest>,
) -> Json<ApiResponse<CollectionView>> {
    respond(update_collection_inner(&state, id, req).await)
}

async fn update_collection_inner(
    state: &AppState,
    id: Uuid,
    req: UpdateCollectionRequest,
) -> Result<CollectionView, ApiError> {
    let existing = repos::get_collection(&state.pool, id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound(format!("collection {id}")))?;

    if existing.creator_wallet != req.wallet_address {
        return Err(ApiError::Ownership("collection belongs to another wallet".into()));
    }

    if let Some(royalty) = req.patch.royalty_percentage {
        if royalty < Decimal::ZERO || royalty > Decimal::from(100) {
            return Err(ApiError::Validation("royalty_percentage must be 0-100".into()));
        }
    }
    if let Some(price) = req.patch.mint_price {
        if price < Decimal::ZERO {
            return Err(ApiError::Validation("mint_price cannot be negative".into()));
        }
    }

    let updated = repos::update_collection(&state.pool, id, &req.patch)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound(format!("collection {id}")))?;

    state.feed.publish(RowChange {
        table: "collections",
        op: ChangeOp::Update,
        wallet: req.wallet_address,
        data: json!({ "id": updated.id }),
    });

    Ok(updated.into())
}

#[derive(Deserialize)]
pub struct DeleteCollectionRequest {
    pub wallet_address: String,
    pub signature: String,
    pub message: String,
}

/// DELETE /api/v1/collections/:id — creator only, signed request.
pub async fn delete_collection(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<DeleteCollectionRequest>,
) -> Json<ApiResponse<serde_json::Value>> {
    respond(delete_collection_inner(&state, id, req).await)
}

async fn delete_collection_inner(
    state: &AppState,
    id: Uuid,
    req: DeleteCollectionRequest,
) -> Result<serde_json::Value, ApiError> {
    let existing = repos::get_collection(&state.pool, id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound(format!("collection {id}")))?;

    if existing.creator_wallet != req.wallet_address {
        return Err(ApiError::Ownership("collection belongs to another wallet".into()));
    }

    let timestamp = wallet::extract_timestamp(&req.message)?;
    wallet::check_freshness(timestamp, Utc::now().timestamp_millis(), wallet::LINK_FRESHNESS)?;
    wallet::verify_signature(&req.wallet_address, &req.message, &req.signature)?;

    repos::delete_collection(&state.pool, id)
        .await
        .map_err(ApiError::internal)?;

    tracing::info!(collection_id = %id, wallet = %req.wallet_address, "collection deleted");

    state.feed.publish(RowChange {
        table: "collections",
        op: ChangeOp::Delete,
        wallet: req.wallet_address,
        data: json!({ "id": id }),
    });

    Ok(json!({ "deleted": true }))
}
