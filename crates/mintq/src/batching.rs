//! Batch math for the mint queue.

use animetoken_storage::models::NewMintJobItem;
use uuid::Uuid;

/// Items per batch. Batches bound the unit of work handed to the minting
/// worker.
pub const BATCH_SIZE: u32 = 50;

/// Maximum rows per multi-value INSERT, to respect payload limits.
pub const INSERT_CHUNK: usize = 100;

/// Rough wall-clock cost of minting one item, used for the user-facing
/// estimate only.
const SECS_PER_MINT: f64 = 2.5;

/// 1-based batch number for the item at `index`.
pub fn batch_number(index: u32) -> i32 {
    (index / BATCH_SIZE) as i32 + 1
}

/// Number of batches a job of `quantity` items splits into.
pub fn total_batches(quantity: u32) -> u32 {
    quantity.div_ceil(BATCH_SIZE)
}

/// Build the full item set for a job, batch numbers assigned in order.
pub fn build_items(quantity: u32) -> Vec<NewMintJobItem> {
    (0..quantity)
        .map(|index| NewMintJobItem {
            id: Uuid::new_v4(),
            batch_number: batch_number(index),
        })
        .collect()
}

/// Coarse completion estimate shown to the user.
pub fn estimate_label(quantity: u32) -> String {
    let secs = quantity as f64 * SECS_PER_MINT;
    if secs < 60.0 {
        return "< 1 minute".to_string();
    }
    let minutes = (secs / 60.0).ceil() as u32;
    if minutes == 1 {
        "~1 minute".to_string()
    } else {
        format!("~{minutes} minutes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn batch_sizes(quantity: u32) -> BTreeMap<i32, usize> {
        let mut sizes = BTreeMap::new();
        for item in build_items(quantity) {
            *sizes.entry(item.batch_number).or_insert(0) += 1;
        }
        sizes
    }

    #[test]
    fn three_items_fit_one_batch() {
        let sizes = batch_sizes(3);
        assert_eq!(sizes.len(), 1);
        assert_eq!(sizes[&1], 3);
        assert_eq!(total_batches(3), 1);
    }

    #[test]
    fn hundred_twenty_items_split_fifty_fifty_twenty() {
        let sizes = batch_sizes(120);
        assert_eq!(sizes.len(), 3);
        assert_eq!(sizes[&1], 50);
        assert_eq!(sizes[&2], 50);
        assert_eq!(sizes[&3], 20);
        assert_eq!(total_batches(120), 3);
    }

    #[test]
    fn every_batch_is_at_most_fifty() {
        for quantity in [1, 49, 50, 51, 99, 100, 250, 333] {
            let sizes = batch_sizes(quantity);
            assert_eq!(sizes.len(), total_batches(quantity) as usize);
            assert!(sizes.values().all(|&n| n <= BATCH_SIZE as usize));
            assert_eq!(sizes.values().sum::<usize>(), quantity as usize);
        }
    }

    #[test]
    fn batch_numbers_are_one_based_and_contiguous() {
        let sizes = batch_sizes(101);
        let batches: Vec<i32> = sizes.keys().copied().collect();
        assert_eq!(batches, vec![1, 2, 3]);
    }

    #[test]
    fn item_ids_are_unique() {
        let items = build_items(120);
        let mut ids: Vec<_> = items.iter().map(|i| i.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 120);
    }

    #[test]
    fn small_jobs_estimate_under_a_minute() {
        assert_eq!(estimate_label(1), "< 1 minute");
        assert_eq!(estimate_label(23), "< 1 minute");
    }

    #[test]
    fn larger_jobs_estimate_in_minutes() {
        // 24 items * 2.5s = 60s
        assert_eq!(estimate_label(24), "~1 minute");
        // 120 items * 2.5s = 300s = 5 minutes
        assert_eq!(estimate_label(120), "~5 minutes");
        // 130 items * 2.5s = 325s, rounded up
        assert_eq!(estimate_label(130), "~6 minutes");
    }
}
