//! In-process row-change feed.
//!
//! Mutating code publishes a [`RowChange`] after every successful write;
//! subscribers (the WebSocket endpoint) receive the stream and filter it by
//! owning wallet. This is the server side of the eventually-consistent
//! reconciliation loop: clients apply optimistic deltas locally and replace
//! them with whatever arrives here.

use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// A single row-change event.
#[derive(Debug, Clone, Serialize)]
pub struct RowChange {
    pub table: &'static str,
    pub op: ChangeOp,
    /// Wallet the change belongs to; subscriptions filter on this.
    pub wallet: String,
    pub data: Value,
}

/// Broadcast fan-out of row changes to any number of subscribers.
///
/// Publishing never blocks and never fails: with no subscribers the event is
/// simply dropped, and slow subscribers observe a lag error on their end.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<RowChange>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, change: RowChange) {
        if self.tx.send(change).is_err() {
            tracing::trace!("row change dropped: no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RowChange> {
        self.tx.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn subscribers_receive_published_changes() {
        let feed = ChangeFeed::default();
        let mut rx = feed.subscribe();

        feed.publish(RowChange {
            table: "nft_likes",
            op: ChangeOp::Insert,
            wallet: "walletA".into(),
            data: json!({"nft_id": "abc"}),
        });

        let change = rx.recv().await.unwrap();
        assert_eq!(change.table, "nft_likes");
        assert_eq!(change.op, ChangeOp::Insert);
        assert_eq!(change.wallet, "walletA");
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let feed = ChangeFeed::default();
        feed.publish(RowChange {
            table: "mint_jobs",
            op: ChangeOp::Delete,
            wallet: "walletA".into(),
            data: json!({}),
        });
    }

    #[test]
    fn change_serializes_with_lowercase_op() {
        let change = RowChange {
            table: "mint_jobs",
            op: ChangeOp::Update,
            wallet: "w".into(),
            data: json!({"status": "processing"}),
        };
        let encoded = serde_json::to_value(&change).unwrap();
        assert_eq!(encoded["op"], "update");
        assert_eq!(encoded["table"], "mint_jobs");
    }
}
