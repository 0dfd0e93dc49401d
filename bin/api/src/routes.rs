//! HTTP router setup.

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, patch, post};
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the application router. The CORS layer answers `OPTIONS` preflight
/// for every route.
pub fn create(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Mint job queue
        .route("/api/v1/mint-jobs", post(handlers::mint::create_mint_job))
        .route("/api/v1/mint-jobs/:id", get(handlers::mint::get_mint_job))
        .route("/api/v1/mint-jobs/:id/cancel", post(handlers::mint::cancel_mint_job))
        .route("/api/v1/wallets/:address/mint-jobs", get(handlers::mint::list_wallet_jobs))
        // Profiles
        .route("/api/v1/profile/nickname", post(handlers::profile::set_nickname))
        .route("/api/v1/profile/bio", post(handlers::profile::set_bio))
        .route("/api/v1/profile/pfp", post(handlers::profile::set_pfp))
        .route("/api/v1/profile/:wallet", get(handlers::profile::get_profile))
        // Collections
        .route("/api/v1/collections", post(handlers::collections::create_collection))
        .route("/api/v1/collections/:id", get(handlers::collections::get_collection))
        .route("/api/v1/collections/:id", patch(handlers::collections::update_collection))
        .route("/api/v1/collections/:id", delete(handlers::collections::delete_collection))
        .route("/api/v1/collections/:id/like", post(handlers::social::like_collection))
        // NFTs
        .route("/api/v1/nfts/:id", get(handlers::nfts::get_nft))
        .route("/api/v1/nfts/:id/like", post(handlers::social::like_nft))
        .route("/api/v1/nfts/:id/burn", post(handlers::nfts::burn_nft))
        .route("/api/v1/nfts/:id/boost", post(handlers::nfts::boost_nft))
        // Creators
        .route("/api/v1/creators/:wallet/follow", post(handlers::social::toggle_follow))
        .route("/api/v1/creators/:wallet/stats", get(handlers::stats::get_creator_stats))
        // Wallet linking
        .route("/api/v1/wallets/link", post(handlers::wallets::link_wallet))
        .route("/api/v1/wallets/unlink", post(handlers::wallets::unlink_wallet))
        .route("/api/v1/users/:wallet/wallets", get(handlers::wallets::get_user_wallets))
        // Newsletter
        .route("/api/v1/newsletter/subscribe", post(handlers::newsletter::subscribe))
        .route("/api/v1/newsletter/confirm", post(handlers::newsletter::confirm))
        .route("/api/v1/newsletter/unsubscribe", post(handlers::newsletter::unsubscribe))
        // Maintenance
        .route("/api/v1/cleanup/orphaned-jobs", post(handlers::cleanup::orphaned_jobs))
        .route("/api/v1/cleanup/expired-boosts", post(handlers::cleanup::expired_boosts))
        // Realtime row-change feed
        .route("/api/v1/subscribe/:wallet", get(handlers::subscribe::subscribe))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
