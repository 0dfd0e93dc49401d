//! Newsletter subscription endpoints. Confirmation emails are sent by an
//! external notification function; this side only manages the rows.

use std::sync::Arc;

use animetoken_core::ApiError;
use animetoken_storage::repos;
use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::response::{ApiResponse, respond};
use crate::state::AppState;
use crate::validate;

#[derive(Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct SubscribeResponse {
    pub email: String,
    pub confirmed: bool,
}

/// POST /api/v1/newsletter/subscribe — re-subscribing is idempotent.
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubscribeRequest>,
) -> Json<ApiResponse<SubscribeResponse>> {
    respond(subscribe_inner(&state, req).await)
}

async fn subscribe_inner(
    state: &AppState,
    req: SubscribeRequest,
) -> Result<SubscribeResponse, ApiError> {
    let email = req.email.trim().to_lowercase();
    validate::validate_email(&email)?;

    let subscriber = repos::upsert_subscriber(&state.pool, &email, Uuid::new_v4())
        .await
        .map_err(ApiError::internal)?;

    tracing::info!(email = %subscriber.email, "newsletter signup");

    Ok(SubscribeResponse {
        email: subscriber.email,
        confirmed: subscriber.confirmed,
    })
}

#[derive(Deserialize)]
pub struct ConfirmRequest {
    pub token: Uuid,
}

/// POST /api/v1/newsletter/confirm
pub async fn confirm(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConfirmRequest>,
) -> Json<ApiResponse<serde_json::Value>> {
    respond(
        async {
            let confirmed = repos::confirm_subscriber(&state.pool, req.token)
                .await
                .map_err(ApiError::internal)?;
            if !confirmed {
                return Err(ApiError::NotFound("confirmation token".into()));
            }
            Ok(serde_json::json!({ "confirmed": true }))
        }
        .await,
    )
}

#[derive(Deserialize)]
pub struct UnsubscribeRequest {
    pub email: String,
}

/// POST /api/v1/newsletter/unsubscribe — unknown addresses succeed.
pub async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UnsubscribeRequest>,
) -> Json<ApiResponse<serde_json::Value>> {
    respond(
        async {
            let removed = repos::delete_subscriber(&state.pool, &req.email.trim().to_lowercase())
                .await
                .map_err(ApiError::internal)?;
            Ok(serde_json::json!({ "removed": removed > 0 }))
        }
        .await,
    )
}
