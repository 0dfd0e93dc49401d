//! Maintenance sweeper — reaps rows the request path cannot clean up.
//!
//! Flow:
//! 1. Connect to PostgreSQL and apply migrations
//! 2. On every tick: delete orphaned mint jobs, expired listing boosts,
//!    and stale unconfirmed newsletter signups
//! 3. Sleep for the configured interval, back off on errors
//!
//! A pending job with zero items should be impossible for the transactional
//! creation path; the orphan sweep guards against interrupted writers and
//! historical rows all the same, and bounds how long such a job can linger.

use animetoken_core::{Settings, telemetry};
use animetoken_storage::{self as storage, PgPool, repos};
use eyre::Result;
use std::time::Duration;

/// Unconfirmed newsletter signups older than this are dropped.
const STALE_SIGNUP_AGE_SECS: i64 = 7 * 24 * 60 * 60;

#[tokio::main]
async fn main() -> Result<()> {
    // ── Initialisation ──────────────────────────────────────────────────
    telemetry::init();
    let settings = Settings::from_env()?;

    tracing::info!(interval_secs = settings.sweep_interval_secs, "Starting maintenance sweeper");

    let pool = storage::connect(&settings.database_url).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    let interval = Duration::from_secs(settings.sweep_interval_secs);

    // ── Main Sweep Loop ─────────────────────────────────────────────────
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutting down gracefully…");
                break;
            }
            result = sweep_once(&pool, &settings) => {
                match result {
                    Ok(()) => tokio::time::sleep(interval).await,
                    Err(e) => {
                        tracing::error!(error = %e, "Sweep failed, retrying in 30s…");
                        tokio::time::sleep(Duration::from_secs(30)).await;
                    }
                }
            }
        }
    }

    tracing::info!("Sweeper stopped.");
    Ok(())
}

/// One maintenance pass. Each sweep is independent; a failure aborts the
/// pass and the loop retries after the backoff.
async fn sweep_once(pool: &PgPool, settings: &Settings) -> Result<(), sqlx::Error> {
    let orphans = repos::delete_orphaned_jobs(pool, settings.orphan_job_age_secs).await?;
    if orphans > 0 {
        tracing::info!(count = orphans, "Removed orphaned mint jobs");
    }

    let boosts = repos::delete_expired_boosts(pool).await?;
    if boosts > 0 {
        tracing::info!(count = boosts, "Removed expired listing boosts");
    }

    let signups = repos::delete_stale_unconfirmed(pool, STALE_SIGNUP_AGE_SECS).await?;
    if signups > 0 {
        tracing::info!(count = signups, "Removed stale unconfirmed newsletter signups");
    }

    Ok(())
}
