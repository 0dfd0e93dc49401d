//! WebSocket row-change subscriptions.
//!
//! Clients open one socket per wallet and receive every [`RowChange`] whose
//! owning wallet matches. The stream is eventually consistent with the
//! store; clients reconcile their optimistic state against it.

use std::sync::Arc;

use animetoken_storage::feed::RowChange;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use tokio::sync::broadcast::error::RecvError;

use crate::state::AppState;

/// GET /api/v1/subscribe/:wallet
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    Path(wallet): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| stream_changes(socket, state, wallet))
}

async fn stream_changes(mut socket: WebSocket, state: Arc<AppState>, wallet: String) {
    let mut rx = state.feed.subscribe();
    tracing::debug!(wallet = %wallet, "change feed subscriber connected");

    loop {
        tokio::select! {
            change = rx.recv() => match change {
                Ok(change) => {
                    if change.wallet != wallet {
                        continue;
                    }
                    if send_change(&mut socket, &change).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(wallet = %wallet, missed, "subscriber lagged behind the feed");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                // Ignore client chatter, terminate on close or error.
                Some(Ok(_)) => {}
                _ => break,
            },
        }
    }

    tracing::debug!(wallet = %wallet, "change feed subscriber disconnected");
}

async fn send_change(socket: &mut WebSocket, change: &RowChange) -> Result<(), axum::Error> {
    let Ok(text) = serde_json::to_string(change) else {
        return Ok(());
    };
    socket.send(Message::Text(text)).await
}
