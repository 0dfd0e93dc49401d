//! ANIME.TOKEN API Server — wallet-linked profiles, the collection/NFT
//! registry, the mint job queue, and the social graph, served over JSON with
//! a WebSocket row-change feed.

mod handlers;
mod response;
mod routes;
mod state;
mod validate;

use std::net::SocketAddr;
use std::sync::Arc;

use animetoken_core::{Settings, telemetry};
use animetoken_storage::{self as storage, feed::ChangeFeed};
use state::AppState;

#[tokio::main]
async fn main() {
    telemetry::init();
    let settings = Settings::from_env().expect("Failed to load settings");

    tracing::info!("Starting ANIME.TOKEN API Server");

    // Connect to database
    let pool = storage::connect(&settings.database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Database ready");

    let state = Arc::new(AppState {
        pool,
        feed: ChangeFeed::default(),
        settings: settings.clone(),
    });

    let app = routes::create(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.api_port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
