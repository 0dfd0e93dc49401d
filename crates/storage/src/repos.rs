use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::*;

// ─── Profile Queries ────────────────────────────────────────────────────────

/// Get a profile by wallet address.
pub async fn get_profile(pool: &PgPool, wallet: &str) -> Result<Option<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE wallet_address = $1")
        .bind(wallet)
        .fetch_optional(pool)
        .await
}

/// Get the profile for a wallet, creating an empty row if none exists yet.
pub async fn ensure_profile(pool: &PgPool, wallet: &str) -> Result<UserProfile, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(
        r#"
        INSERT INTO user_profiles (wallet_address)
        VALUES ($1)
        ON CONFLICT (wallet_address) DO UPDATE SET wallet_address = EXCLUDED.wallet_address
        RETURNING *
        "#,
    )
    .bind(wallet)
    .fetch_one(pool)
    .await
}

/// Check whether a nickname is already claimed by a different wallet.
pub async fn nickname_taken(
    pool: &PgPool,
    nickname: &str,
    wallet: &str,
) -> Result<bool, sqlx::Error> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM user_profiles WHERE nickname = $1 AND wallet_address != $2)",
    )
    .bind(nickname)
    .bind(wallet)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

/// Set a wallet's nickname and consume its free first change.
pub async fn set_nickname(
    pool: &PgPool,
    wallet: &str,
    nickname: &str,
) -> Result<UserProfile, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(
        r#"
        UPDATE user_profiles
        SET nickname = $2, nickname_unlocked = TRUE, updated_at = NOW()
        WHERE wallet_address = $1
        RETURNING *
        "#,
    )
    .bind(wallet)
    .bind(nickname)
    .fetch_one(pool)
    .await
}

/// Set a wallet's bio and consume its free first change.
pub async fn set_bio(pool: &PgPool, wallet: &str, bio: &str) -> Result<UserProfile, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(
        r#"
        UPDATE user_profiles
        SET bio = $2, bio_unlocked = TRUE, updated_at = NOW()
        WHERE wallet_address = $1
        RETURNING *
        "#,
    )
    .bind(wallet)
    .bind(bio)
    .fetch_one(pool)
    .await
}

/// Set a wallet's avatar to one of its NFTs and consume the free first change.
pub async fn set_avatar(
    pool: &PgPool,
    wallet: &str,
    nft_id: Uuid,
    image_url: &str,
) -> Result<UserProfile, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>(
        r#"
        UPDATE user_profiles
        SET avatar_nft_id = $2, avatar_url = $3, avatar_unlocked = TRUE, updated_at = NOW()
        WHERE wallet_address = $1
        RETURNING *
        "#,
    )
    .bind(wallet)
    .bind(nft_id)
    .bind(image_url)
    .fetch_one(pool)
    .await
}

// ─── Linked Wallet Queries ──────────────────────────────────────────────────

/// Find an existing link for a secondary wallet.
pub async fn get_linked_wallet(
    pool: &PgPool,
    wallet: &str,
) -> Result<Option<LinkedWallet>, sqlx::Error> {
    sqlx::query_as::<_, LinkedWallet>("SELECT * FROM linked_wallets WHERE wallet_address = $1")
        .bind(wallet)
        .fetch_optional(pool)
        .await
}

/// Link a secondary wallet to a primary account wallet.
pub async fn link_wallet(
    pool: &PgPool,
    wallet: &str,
    primary: &str,
) -> Result<LinkedWallet, sqlx::Error> {
    sqlx::query_as::<_, LinkedWallet>(
        r#"
        INSERT INTO linked_wallets (wallet_address, primary_wallet)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(wallet)
    .bind(primary)
    .fetch_one(pool)
    .await
}

/// Remove a wallet link. Deleting a non-existent link is not an error.
pub async fn unlink_wallet(pool: &PgPool, wallet: &str, primary: &str) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM linked_wallets WHERE wallet_address = $1 AND primary_wallet = $2")
            .bind(wallet)
            .bind(primary)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}

/// All secondary wallets linked to a primary, oldest first.
pub async fn get_wallets_for_primary(
    pool: &PgPool,
    primary: &str,
) -> Result<Vec<LinkedWallet>, sqlx::Error> {
    sqlx::query_as::<_, LinkedWallet>(
        "SELECT * FROM linked_wallets WHERE primary_wallet = $1 ORDER BY linked_at",
    )
    .bind(primary)
    .fetch_all(pool)
    .await
}

// ─── Collection Queries ─────────────────────────────────────────────────────

pub async fn insert_collection(
    pool: &PgPool,
    collection: &NewCollection,
) -> Result<Collection, sqlx::Error> {
    sqlx::query_as::<_, Collection>(
        r#"
        INSERT INTO collections
            (id, creator_wallet, name, description, category, image_url,
             mint_price, royalty_percentage, max_supply, items_available, is_active, is_live)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(collection.id)
    .bind(&collection.creator_wallet)
    .bind(&collection.name)
    .bind(&collection.description)
    .bind(&collection.category)
    .bind(&collection.image_url)
    .bind(collection.mint_price)
    .bind(collection.royalty_percentage)
    .bind(collection.max_supply)
    .bind(collection.is_active)
    .bind(collection.is_live)
    .fetch_one(pool)
    .await
}

pub async fn get_collection(pool: &PgPool, id: Uuid) -> Result<Option<Collection>, sqlx::Error> {
    sqlx::query_as::<_, Collection>("SELECT * FROM collections WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Apply a partial update; absent fields keep their current value.
pub async fn update_collection(
    pool: &PgPool,
    id: Uuid,
    patch: &CollectionPatch,
) -> Result<Option<Collection>, sqlx::Error> {
    sqlx::query_as::<_, Collection>(
        r#"
        UPDATE collections
        SET name = COALESCE($2, name),
            description = COALESCE($3, description),
            category = COALESCE($4, category),
            image_url = COALESCE($5, image_url),
            mint_price = COALESCE($6, mint_price),
            royalty_percentage = COALESCE($7, royalty_percentage),
            is_active = COALESCE($8, is_active),
            is_live = COALESCE($9, is_live),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&patch.name)
    .bind(&patch.description)
    .bind(&patch.category)
    .bind(&patch.image_url)
    .bind(patch.mint_price)
    .bind(patch.royalty_percentage)
    .bind(patch.is_active)
    .bind(patch.is_live)
    .fetch_optional(pool)
    .await
}

pub async fn delete_collection(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM collections WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

// ─── NFT Queries ────────────────────────────────────────────────────────────

pub async fn get_nft(pool: &PgPool, id: Uuid) -> Result<Option<Nft>, sqlx::Error> {
    sqlx::query_as::<_, Nft>("SELECT * FROM nfts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Remove an NFT from the registry (burn).
pub async fn delete_nft(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM nfts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

// ─── Mint Job Queries ───────────────────────────────────────────────────────

/// Insert the job row for a new mint request (`status = pending`).
/// Runs on any executor so job and items can share one transaction.
pub async fn insert_mint_job<'e, E>(
    executor: E,
    id: Uuid,
    wallet: &str,
    collection_id: Uuid,
    total_quantity: i32,
    total_cost: Decimal,
) -> Result<MintJob, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, MintJob>(
        r#"
        INSERT INTO mint_jobs (id, wallet_address, collection_id, total_quantity, total_cost)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(wallet)
    .bind(collection_id)
    .bind(total_quantity)
    .bind(total_cost)
    .fetch_one(executor)
    .await
}

/// Insert one chunk of job items using a single multi-value INSERT.
///
/// Callers are responsible for keeping chunks within the payload limit.
pub async fn insert_mint_job_items<'e, E>(
    executor: E,
    job_id: Uuid,
    items: &[NewMintJobItem],
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    if items.is_empty() {
        return Ok(());
    }

    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO mint_job_items (id, job_id, batch_number) ");

    qb.push_values(items, |mut b, item| {
        b.push_bind(item.id).push_bind(job_id).push_bind(item.batch_number);
    });

    qb.build().execute(executor).await?;
    Ok(())
}

pub async fn get_mint_job(pool: &PgPool, id: Uuid) -> Result<Option<MintJob>, sqlx::Error> {
    sqlx::query_as::<_, MintJob>("SELECT * FROM mint_jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// All items for a job, in batch order.
pub async fn get_mint_job_items(
    pool: &PgPool,
    job_id: Uuid,
) -> Result<Vec<MintJobItem>, sqlx::Error> {
    sqlx::query_as::<_, MintJobItem>(
        "SELECT * FROM mint_job_items WHERE job_id = $1 ORDER BY batch_number, id",
    )
    .bind(job_id)
    .fetch_all(pool)
    .await
}

/// Recent jobs created by a wallet, newest first.
pub async fn get_mint_jobs_for_wallet(
    pool: &PgPool,
    wallet: &str,
    limit: i64,
) -> Result<Vec<MintJob>, sqlx::Error> {
    sqlx::query_as::<_, MintJob>(
        "SELECT * FROM mint_jobs WHERE wallet_address = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(wallet)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Cancel a job that is still pending and owned by the caller.
///
/// Returns `None` when the job is missing, already picked up by the worker,
/// or owned by someone else.
pub async fn cancel_pending_job(
    pool: &PgPool,
    id: Uuid,
    wallet: &str,
) -> Result<Option<MintJob>, sqlx::Error> {
    sqlx::query_as::<_, MintJob>(
        r#"
        UPDATE mint_jobs
        SET status = 'cancelled', completed_at = NOW()
        WHERE id = $1 AND wallet_address = $2 AND status = 'pending'
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(wallet)
    .fetch_optional(pool)
    .await
}

/// Jobs created by a wallet inside the sliding rate-limit window.
pub async fn count_recent_jobs(
    pool: &PgPool,
    wallet: &str,
    window_secs: i64,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM mint_jobs
        WHERE wallet_address = $1 AND created_at > NOW() - make_interval(secs => $2)
        "#,
    )
    .bind(wallet)
    .bind(window_secs as f64)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

/// Reap pending jobs left with zero items by interrupted or misbehaving
/// writers.
pub async fn delete_orphaned_jobs(pool: &PgPool, age_secs: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM mint_jobs j
        WHERE j.status = 'pending'
          AND j.created_at < NOW() - make_interval(secs => $1)
          AND NOT EXISTS (SELECT 1 FROM mint_job_items i WHERE i.job_id = j.id)
        "#,
    )
    .bind(age_secs as f64)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

// ─── Like Queries ───────────────────────────────────────────────────────────

/// Record a like. Returns `false` when the row already existed.
pub async fn like_nft(pool: &PgPool, wallet: &str, nft_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO nft_likes (wallet_address, nft_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(wallet)
    .bind(nft_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Remove a like. Removing a non-existent like is not an error.
pub async fn unlike_nft(pool: &PgPool, wallet: &str, nft_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM nft_likes WHERE wallet_address = $1 AND nft_id = $2")
        .bind(wallet)
        .bind(nft_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn nft_like_count(pool: &PgPool, nft_id: Uuid) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM nft_likes WHERE nft_id = $1")
        .bind(nft_id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

pub async fn like_collection(
    pool: &PgPool,
    wallet: &str,
    collection_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO collection_likes (wallet_address, collection_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(wallet)
    .bind(collection_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn unlike_collection(
    pool: &PgPool,
    wallet: &str,
    collection_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM collection_likes WHERE wallet_address = $1 AND collection_id = $2")
            .bind(wallet)
            .bind(collection_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn collection_like_count(
    pool: &PgPool,
    collection_id: Uuid,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM collection_likes WHERE collection_id = $1")
            .bind(collection_id)
            .fetch_one(pool)
            .await?;
    Ok(row.0)
}

// ─── Follow Queries ─────────────────────────────────────────────────────────

/// Follow a creator. Returns `false` when already following.
pub async fn follow_creator(
    pool: &PgPool,
    follower: &str,
    creator: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO creator_follows (follower_wallet, creator_wallet)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(follower)
    .bind(creator)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn unfollow_creator(
    pool: &PgPool,
    follower: &str,
    creator: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM creator_follows WHERE follower_wallet = $1 AND creator_wallet = $2",
    )
    .bind(follower)
    .bind(creator)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn follower_count(pool: &PgPool, creator: &str) -> Result<i64, sqlx::Error> {
    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM creator_follows WHERE creator_wallet = $1")
            .bind(creator)
            .fetch_one(pool)
            .await?;
    Ok(row.0)
}

// ─── Listing Boost Queries ──────────────────────────────────────────────────

pub async fn insert_boost(
    pool: &PgPool,
    id: Uuid,
    nft_id: Uuid,
    wallet: &str,
    duration_secs: i64,
) -> Result<ListingBoost, sqlx::Error> {
    sqlx::query_as::<_, ListingBoost>(
        r#"
        INSERT INTO listing_boosts (id, nft_id, wallet_address, expires_at)
        VALUES ($1, $2, $3, NOW() + make_interval(secs => $4))
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(nft_id)
    .bind(wallet)
    .bind(duration_secs as f64)
    .fetch_one(pool)
    .await
}

pub async fn delete_expired_boosts(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM listing_boosts WHERE expires_at < NOW()")
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

// ─── Newsletter Queries ─────────────────────────────────────────────────────

/// Subscribe an email address. Re-subscribing refreshes the timestamp but
/// keeps the original confirmation token and confirmed flag.
pub async fn upsert_subscriber(
    pool: &PgPool,
    email: &str,
    token: Uuid,
) -> Result<NewsletterSubscriber, sqlx::Error> {
    sqlx::query_as::<_, NewsletterSubscriber>(
        r#"
        INSERT INTO newsletter_subscribers (email, confirmation_token)
        VALUES ($1, $2)
        ON CONFLICT (email) DO UPDATE SET subscribed_at = NOW()
        RETURNING *
        "#,
    )
    .bind(email)
    .bind(token)
    .fetch_one(pool)
    .await
}

/// Confirm a subscription by token. Returns `false` for unknown tokens.
pub async fn confirm_subscriber(pool: &PgPool, token: Uuid) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("UPDATE newsletter_subscribers SET confirmed = TRUE WHERE confirmation_token = $1")
            .bind(token)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}

/// Unsubscribe an email. Removing an unknown address is not an error.
pub async fn delete_subscriber(pool: &PgPool, email: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM newsletter_subscribers WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Reap signups that were never confirmed.
pub async fn delete_stale_unconfirmed(pool: &PgPool, age_secs: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM newsletter_subscribers
        WHERE confirmed = FALSE AND subscribed_at < NOW() - make_interval(secs => $1)
        "#,
    )
    .bind(age_secs as f64)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

// ─── Creator Stats ──────────────────────────────────────────────────────────

/// Aggregate numbers for a creator page, in a single round-trip.
pub async fn creator_stats(pool: &PgPool, wallet: &str) -> Result<CreatorStats, sqlx::Error> {
    sqlx::query_as::<_, CreatorStats>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM nfts WHERE creator_wallet = $1) AS nft_count,
            (SELECT COUNT(*) FROM collections WHERE creator_wallet = $1) AS collection_count,
            (SELECT COUNT(*)
             FROM nft_likes l
             JOIN nfts n ON n.id = l.nft_id
             WHERE n.creator_wallet = $1) AS total_nft_likes,
            (SELECT COUNT(*) FROM creator_follows WHERE creator_wallet = $1) AS follower_count,
            COALESCE((SELECT trade_count FROM user_profiles WHERE wallet_address = $1), 0) AS trade_count
        "#,
    )
    .bind(wallet)
    .fetch_one(pool)
    .await
}
