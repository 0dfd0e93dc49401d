use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

// ─── Status Enums ───────────────────────────────────────────────────────────

/// Lifecycle of a mint job. Transitions past `pending` are driven by the
/// external minting worker; this service only creates and cancels jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "mint_job_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MintJobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

/// Lifecycle of a single unit of work within a mint job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "mint_item_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MintItemStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Retrying,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "profile_rank", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProfileRank {
    Default,
    Bronze,
    Silver,
    Gold,
    Diamond,
}

// ─── UserProfile ────────────────────────────────────────────────────────────

/// One row per wallet. The three `*_unlocked` flags implement the
/// first-change-free / pay-to-change rule independently per field.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub wallet_address: String,
    pub nickname: Option<String>,
    pub bio: String,
    pub avatar_url: String,
    pub avatar_nft_id: Option<Uuid>,
    pub profile_rank: ProfileRank,
    pub trade_count: i64,
    pub nickname_unlocked: bool,
    pub bio_unlocked: bool,
    pub avatar_unlocked: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// ─── LinkedWallet ───────────────────────────────────────────────────────────

/// A secondary wallet bound to a primary account wallet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LinkedWallet {
    pub wallet_address: String,
    pub primary_wallet: String,
    pub linked_at: NaiveDateTime,
}

// ─── Collection ─────────────────────────────────────────────────────────────

/// A mintable series with supply counters and activation flags.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Collection {
    pub id: Uuid,
    pub creator_wallet: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
    pub mint_price: Decimal,
    pub royalty_percentage: Decimal,
    pub max_supply: i32,
    pub items_available: i32,
    pub items_redeemed: i32,
    pub is_active: bool,
    pub is_live: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Collection {
    /// Marketplace listing eligibility, computed on read and never persisted.
    ///
    /// A collection is listable once every required field is filled in and it
    /// is both active and live.
    pub fn is_listable(&self) -> bool {
        self.mint_price > Decimal::ZERO
            && !self.category.trim().is_empty()
            && !self.description.trim().is_empty()
            && !self.image_url.trim().is_empty()
            && self.royalty_percentage >= Decimal::ZERO
            && self.royalty_percentage <= Decimal::from(100)
            && self.is_active
            && self.is_live
    }
}

/// Insert-ready collection (no timestamps).
#[derive(Debug, Clone)]
pub struct NewCollection {
    pub id: Uuid,
    pub creator_wallet: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
    pub mint_price: Decimal,
    pub royalty_percentage: Decimal,
    pub max_supply: i32,
    pub is_active: bool,
    pub is_live: bool,
}

/// Partial update for a collection; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub mint_price: Option<Decimal>,
    pub royalty_percentage: Option<Decimal>,
    pub is_active: Option<bool>,
    pub is_live: Option<bool>,
}

// ─── NFT ────────────────────────────────────────────────────────────────────

/// An individual token row. `attributes` is free-form JSON in either
/// array-of-trait or flat-object form; use [`Nft::normalized_attributes`]
/// for display.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Nft {
    pub id: Uuid,
    pub collection_id: Option<Uuid>,
    pub owner_wallet: String,
    pub creator_wallet: String,
    pub name: String,
    pub image_url: String,
    pub mint_address: Option<String>,
    pub is_listed: bool,
    pub list_price: Option<Decimal>,
    pub attributes: Value,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A single display-ready attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftTrait {
    pub trait_type: String,
    pub value: String,
}

impl Nft {
    /// Normalize the free-form `attributes` column into a flat trait list.
    ///
    /// Accepts `[{"trait_type": "...", "value": ...}, ...]` (the Metaplex
    /// shape) or a flat `{"Background": "Blue", ...}` object. Anything else
    /// normalizes to an empty list.
    pub fn normalized_attributes(&self) -> Vec<NftTrait> {
        normalize_attributes(&self.attributes)
    }
}

pub fn normalize_attributes(attributes: &Value) -> Vec<NftTrait> {
    fn scalar_to_string(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    match attributes {
        Value::Array(entries) => entries
            .iter()
            .filter_map(|entry| {
                let obj = entry.as_object()?;
                let trait_type = obj.get("trait_type")?.as_str()?.to_string();
                let value = scalar_to_string(obj.get("value")?)?;
                Some(NftTrait { trait_type, value })
            })
            .collect(),
        Value::Object(map) => map
            .iter()
            .filter_map(|(key, value)| {
                Some(NftTrait {
                    trait_type: key.clone(),
                    value: scalar_to_string(value)?,
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}

// ─── MintJob ────────────────────────────────────────────────────────────────

/// One user request to mint N copies from a collection.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MintJob {
    pub id: Uuid,
    pub wallet_address: String,
    pub collection_id: Uuid,
    pub total_quantity: i32,
    pub completed_quantity: i32,
    pub failed_quantity: i32,
    pub total_cost: Decimal,
    pub status: MintJobStatus,
    pub created_at: NaiveDateTime,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
}

/// One unit of work within a mint job's batch.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MintJobItem {
    pub id: Uuid,
    pub job_id: Uuid,
    pub batch_number: i32,
    pub status: MintItemStatus,
    pub retry_count: i32,
    pub max_retries: i32,
    pub mint_address: Option<String>,
    pub transaction_signature: Option<String>,
    pub error_message: Option<String>,
}

/// Insert-ready mint job item (status and retry counters take column defaults).
#[derive(Debug, Clone)]
pub struct NewMintJobItem {
    pub id: Uuid,
    pub batch_number: i32,
}

// ─── ListingBoost ───────────────────────────────────────────────────────────

/// A paid visibility boost for a listed NFT; expired rows are swept.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ListingBoost {
    pub id: Uuid,
    pub nft_id: Uuid,
    pub wallet_address: String,
    pub boosted_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

// ─── NewsletterSubscriber ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NewsletterSubscriber {
    pub email: String,
    pub confirmation_token: Uuid,
    pub confirmed: bool,
    pub subscribed_at: NaiveDateTime,
}

// ─── CreatorStats ───────────────────────────────────────────────────────────

/// Aggregate numbers shown on a creator page.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CreatorStats {
    pub nft_count: i64,
    pub collection_count: i64,
    pub total_nft_likes: i64,
    pub follower_count: i64,
    pub trade_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listable_collection() -> Collection {
        Collection {
            id: Uuid::nil(),
            creator_wallet: "creator".into(),
            name: "Sakura Drop".into(),
            description: "Hand-drawn cels".into(),
            category: "art".into(),
            image_url: "https://img.example/cover.png".into(),
            mint_price: Decimal::new(5, 1), // 0.5
            royalty_percentage: Decimal::from(5),
            max_supply: 100,
            items_available: 100,
            items_redeemed: 0,
            is_active: true,
            is_live: true,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn complete_live_collection_is_listable() {
        assert!(listable_collection().is_listable());
    }

    #[test]
    fn missing_required_fields_block_listing() {
        let mut c = listable_collection();
        c.description = "  ".into();
        assert!(!c.is_listable());

        let mut c = listable_collection();
        c.mint_price = Decimal::ZERO;
        assert!(!c.is_listable());

        let mut c = listable_collection();
        c.royalty_percentage = Decimal::from(101);
        assert!(!c.is_listable());
    }

    #[test]
    fn inactive_or_not_live_blocks_listing() {
        let mut c = listable_collection();
        c.is_active = false;
        assert!(!c.is_listable());

        let mut c = listable_collection();
        c.is_live = false;
        assert!(!c.is_listable());
    }

    #[test]
    fn normalizes_trait_array() {
        let attrs = json!([
            {"trait_type": "Background", "value": "Blue"},
            {"trait_type": "Generation", "value": 2},
            {"value": "orphan value"}
        ]);
        let traits = normalize_attributes(&attrs);
        assert_eq!(
            traits,
            vec![
                NftTrait { trait_type: "Background".into(), value: "Blue".into() },
                NftTrait { trait_type: "Generation".into(), value: "2".into() },
            ]
        );
    }

    #[test]
    fn normalizes_flat_object() {
        let attrs = json!({"Background": "Blue", "Rare": true});
        let traits = normalize_attributes(&attrs);
        assert_eq!(traits.len(), 2);
        assert!(traits.iter().any(|t| t.trait_type == "Rare" && t.value == "true"));
    }

    #[test]
    fn junk_attributes_normalize_to_empty() {
        assert!(normalize_attributes(&json!("just a string")).is_empty());
        assert!(normalize_attributes(&json!(null)).is_empty());
    }
}
