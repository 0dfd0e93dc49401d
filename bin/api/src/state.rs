//! Application state shared across handlers.

use animetoken_core::Settings;
use animetoken_storage::PgPool;
use animetoken_storage::feed::ChangeFeed;

pub struct AppState {
    pub pool: PgPool,
    pub feed: ChangeFeed,
    pub settings: Settings,
}
