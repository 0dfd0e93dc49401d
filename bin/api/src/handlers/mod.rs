pub mod cleanup;
pub mod collections;
pub mod mint;
pub mod newsletter;
pub mod nfts;
pub mod profile;
pub mod social;
pub mod stats;
pub mod subscribe;
pub mod wallets;

pub async fn health() -> &'static str {
    "ok"
}
