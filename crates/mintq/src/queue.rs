//! Mint job creation and cancellation.
//!
//! Creation is the one workflow-shaped write in the system: validate the
//! signed request, check supply, then persist one job row plus its batched
//! items inside a single transaction so a crash can never leave a job
//! without its items.

use animetoken_core::{ApiError, Settings};
use animetoken_storage::PgPool;
use animetoken_storage::feed::{ChangeFeed, ChangeOp, RowChange};
use animetoken_storage::models::MintJob;
use animetoken_storage::repos;
use animetoken_wallet as wallet;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::batching;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMintJobRequest {
    pub collection_id: Uuid,
    pub quantity: u32,
    pub wallet_address: String,
    pub signature: String,
    pub message: String,
}

/// What the client gets back from a successful mint request.
#[derive(Debug, Clone, Serialize)]
pub struct MintJobReceipt {
    pub job_id: Uuid,
    pub total_batches: u32,
    pub total_cost: Decimal,
    pub estimated_time: String,
}

/// Signature prechecks shared with tests: freshness first, then binding to
/// the requesting wallet, then the actual verification.
fn precheck_signature(req: &CreateMintJobRequest, now_ms: i64) -> Result<(), ApiError> {
    let timestamp = wallet::extract_timestamp(&req.message)?;
    wallet::check_freshness(timestamp, now_ms, wallet::MINT_FRESHNESS)?;
    if !req.message.contains(&req.wallet_address) {
        return Err(ApiError::Validation(
            "message does not reference the requesting wallet".into(),
        ));
    }
    wallet::verify_signature(&req.wallet_address, &req.message, &req.signature)
}

/// Create a mint job and its batched items.
pub async fn create_mint_job(
    pool: &PgPool,
    feed: &ChangeFeed,
    settings: &Settings,
    req: &CreateMintJobRequest,
) -> Result<MintJobReceipt, ApiError> {
    if req.quantity == 0 {
        return Err(ApiError::Validation("quantity must be greater than zero".into()));
    }
    let quantity: i32 = req
        .quantity
        .try_into()
        .map_err(|_| ApiError::Validation("quantity is out of range".into()))?;

    precheck_signature(req, Utc::now().timestamp_millis())?;

    let recent = repos::count_recent_jobs(pool, &req.wallet_address, settings.mint_window_secs)
        .await
        .map_err(ApiError::internal)?;
    if recent >= settings.mint_jobs_per_window {
        return Err(ApiError::RateLimited(format!(
            "at most {} mint jobs per {} seconds",
            settings.mint_jobs_per_window, settings.mint_window_secs
        )));
    }

    let collection = repos::get_collection(pool, req.collection_id)
        .await
        .map_err(ApiError::internal)?
        .ok_or(ApiError::CollectionUnavailable)?;
    if !(collection.is_active && collection.is_live) {
        return Err(ApiError::CollectionUnavailable);
    }
    if collection.items_available < quantity {
        return Err(ApiError::InsufficientSupply);
    }

    let total_cost = collection.mint_price * Decimal::from(quantity);
    let job_id = Uuid::new_v4();

    // Job row and item rows commit together; a failed item insert rolls the
    // whole request back. Item creation stays chunked to respect payload
    // limits.
    let mut tx = pool.begin().await.map_err(ApiError::internal)?;

    repos::insert_mint_job(
        &mut *tx,
        job_id,
        &req.wallet_address,
        collection.id,
        quantity,
        total_cost,
    )
    .await
    .map_err(ApiError::internal)?;

    let items = batching::build_items(req.quantity);
    for chunk in items.chunks(batching::INSERT_CHUNK) {
        repos::insert_mint_job_items(&mut *tx, job_id, chunk)
            .await
            .map_err(ApiError::internal)?;
    }

    tx.commit().await.map_err(ApiError::internal)?;

    tracing::info!(
        job_id = %job_id,
        wallet = %req.wallet_address,
        quantity = quantity,
        batches = batching::total_batches(req.quantity),
        "mint job created"
    );

    feed.publish(RowChange {
        table: "mint_jobs",
        op: ChangeOp::Insert,
        wallet: req.wallet_address.clone(),
        data: serde_json::json!({
            "id": job_id,
            "collection_id": collection.id,
            "total_quantity": quantity,
            "status": "pending",
        }),
    });

    Ok(MintJobReceipt {
        job_id,
        total_batches: batching::total_batches(req.quantity),
        total_cost,
        estimated_time: batching::estimate_label(req.quantity),
    })
}

/// Cancel a pending job owned by the caller.
pub async fn cancel_mint_job(
    pool: &PgPool,
    feed: &ChangeFeed,
    job_id: Uuid,
    wallet_address: &str,
) -> Result<MintJob, ApiError> {
    if let Some(job) = repos::cancel_pending_job(pool, job_id, wallet_address)
        .await
        .map_err(ApiError::internal)?
    {
        feed.publish(RowChange {
            table: "mint_jobs",
            op: ChangeOp::Update,
            wallet: wallet_address.to_string(),
            data: serde_json::json!({ "id": job.id, "status": "cancelled" }),
        });
        return Ok(job);
    }

    // The conditional update matched nothing; classify why.
    match repos::get_mint_job(pool, job_id).await.map_err(ApiError::internal)? {
        None => Err(ApiError::NotFound(format!("mint job {job_id}"))),
        Some(job) if job.wallet_address != wallet_address => {
            Err(ApiError::Ownership("job belongs to another wallet".into()))
        }
        Some(_) => Err(ApiError::Conflict("only pending jobs can be cancelled".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(message: &str) -> CreateMintJobRequest {
        CreateMintJobRequest {
            collection_id: Uuid::new_v4(),
            quantity: 1,
            wallet_address: "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin".into(),
            signature: "sig".into(),
            message: message.into(),
        }
    }

    #[test]
    fn stale_timestamp_fails_before_signature_check() {
        let now = 1_700_000_000_000;
        let stale = now - 6 * 60 * 1000;
        let req = request(&format!(
            "Mint 1 from my wallet 9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin\n\nTimestamp: {stale}"
        ));
        let err = precheck_signature(&req, now).unwrap_err();
        assert_eq!(err.code(), "expired_signature");
    }

    #[test]
    fn message_must_reference_the_wallet() {
        let now = 1_700_000_000_000;
        let req = request(&format!("Mint 1 item\n\nTimestamp: {now}"));
        let err = precheck_signature(&req, now).unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn missing_timestamp_is_rejected() {
        let req = request("Mint 1 item, no timestamp");
        let err = precheck_signature(&req, 1_700_000_000_000).unwrap_err();
        assert_eq!(err.code(), "validation_error");
    }
}
