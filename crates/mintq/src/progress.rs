//! Client-facing progress derivation. Nothing here is persisted; the view is
//! recomputed from the job row and its items on every read.

use animetoken_storage::models::{MintItemStatus, MintJob, MintJobItem, MintJobStatus};
use serde::Serialize;

/// Derived progress for one mint job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobProgress {
    pub total_quantity: i32,
    pub completed_items: i32,
    pub failed_items: i32,
    /// Items in flight; retrying items count as processing.
    pub processing_items: i32,
    pub pending_items: i32,
    pub progress_percentage: f64,
    pub is_completed: bool,
    pub is_failed: bool,
    pub is_processing: bool,
}

/// Pure aggregation over a job's items.
pub fn job_progress(job: &MintJob, items: &[MintJobItem]) -> JobProgress {
    let mut completed = 0;
    let mut failed = 0;
    let mut processing = 0;
    let mut pending = 0;

    for item in items {
        match item.status {
            MintItemStatus::Completed => completed += 1,
            MintItemStatus::Failed => failed += 1,
            MintItemStatus::Processing | MintItemStatus::Retrying => processing += 1,
            MintItemStatus::Pending => pending += 1,
        }
    }

    let progress_percentage = if job.total_quantity > 0 {
        f64::from(job.completed_quantity) / f64::from(job.total_quantity) * 100.0
    } else {
        0.0
    };

    JobProgress {
        total_quantity: job.total_quantity,
        completed_items: completed,
        failed_items: failed,
        processing_items: processing,
        pending_items: pending,
        progress_percentage,
        is_completed: job.status == MintJobStatus::Completed,
        is_failed: job.status == MintJobStatus::Failed,
        is_processing: job.status == MintJobStatus::Processing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn job(total: i32, completed: i32, failed: i32, status: MintJobStatus) -> MintJob {
        MintJob {
            id: Uuid::new_v4(),
            wallet_address: "wallet".into(),
            collection_id: Uuid::new_v4(),
            total_quantity: total,
            completed_quantity: completed,
            failed_quantity: failed,
            total_cost: Decimal::ZERO,
            status,
            created_at: NaiveDateTime::default(),
            started_at: None,
            completed_at: None,
        }
    }

    fn item(job_id: Uuid, status: MintItemStatus) -> MintJobItem {
        MintJobItem {
            id: Uuid::new_v4(),
            job_id,
            batch_number: 1,
            status,
            retry_count: 0,
            max_retries: 3,
            mint_address: None,
            transaction_signature: None,
            error_message: None,
        }
    }

    #[test]
    fn counts_partition_the_item_set() {
        use MintItemStatus::*;
        let j = job(7, 2, 1, MintJobStatus::Processing);
        let items: Vec<_> = [Completed, Completed, Failed, Processing, Retrying, Pending, Pending]
            .into_iter()
            .map(|s| item(j.id, s))
            .collect();

        let p = job_progress(&j, &items);
        assert_eq!(p.completed_items, 2);
        assert_eq!(p.failed_items, 1);
        assert_eq!(p.processing_items, 2);
        assert_eq!(p.pending_items, 2);
        assert_eq!(
            p.completed_items + p.failed_items + p.processing_items + p.pending_items,
            items.len() as i32
        );
    }

    #[test]
    fn percentage_follows_job_counters() {
        let j = job(4, 1, 0, MintJobStatus::Processing);
        let p = job_progress(&j, &[]);
        assert_eq!(p.progress_percentage, 25.0);
    }

    #[test]
    fn flags_mirror_job_status() {
        let p = job_progress(&job(1, 1, 0, MintJobStatus::Completed), &[]);
        assert!(p.is_completed && !p.is_failed && !p.is_processing);

        let p = job_progress(&job(1, 0, 1, MintJobStatus::Failed), &[]);
        assert!(p.is_failed && !p.is_completed);

        let p = job_progress(&job(1, 0, 0, MintJobStatus::Cancelled), &[]);
        assert!(!p.is_completed && !p.is_failed && !p.is_processing);
    }

    #[test]
    fn zero_total_does_not_divide_by_zero() {
        let p = job_progress(&job(0, 0, 0, MintJobStatus::Pending), &[]);
        assert_eq!(p.progress_percentage, 0.0);
    }
}
