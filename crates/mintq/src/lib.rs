pub mod batching;
pub mod progress;
pub mod queue;

pub use batching::{BATCH_SIZE, INSERT_CHUNK, build_items, estimate_label, total_batches};
pub use progress::{JobProgress, job_progress};
pub use queue::{CreateMintJobRequest, MintJobReceipt, cancel_mint_job, create_mint_job};
