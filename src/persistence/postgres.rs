//! PostgreSQL implementation of the pool aggregate store.
//!
//! The store is the sole source of truth for concurrent-safety
//! primitives: the `(pool_id, user_id)` and `(pool_id, tier_id)` unique
//! constraints and transaction isolation. Every method that participates
//! in a repricing transaction takes a `&mut PgConnection`, so the service
//! composes them inside a single [`serializable
//! transaction`](PostgresPoolStore::begin_serializable); plain read paths
//! for the polling endpoints go through the connection pool directly.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::models::{MemberRow, PoolRow};
use crate::domain::{PoolId, PricingTier, TierId};
use crate::error::ApiError;

/// PostgreSQL-backed pool aggregate store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPoolStore {
    pool: PgPool,
}

impl PostgresPoolStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a transaction at `SERIALIZABLE` isolation.
    ///
    /// Under weaker isolation two concurrent joins could each read the
    /// pre-join aggregate and each select a tier that omits the other's
    /// contribution (write skew). Serializable isolation makes Postgres
    /// abort one of the two with SQLSTATE 40001 instead, which maps to
    /// [`ApiError::SerializationConflict`].
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on database failure.
    pub async fn begin_serializable(&self) -> Result<Transaction<'static, Postgres>, ApiError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    /// Loads a pool row with `FOR UPDATE`, scoped to the owning business
    /// and excluding soft-deleted pools. Returns `None` if no such pool.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on database failure.
    pub async fn find_pool_for_update(
        &self,
        conn: &mut PgConnection,
        pool_id: PoolId,
        business_id: Uuid,
    ) -> Result<Option<PoolRow>, ApiError> {
        let row = sqlx::query_as::<_, (PoolId, Uuid, Uuid, String, i64, Option<TierId>, DateTime<Utc>, DateTime<Utc>)>(
            "SELECT id, business_id, product_id, status, total_quantity, applied_tier_id, \
                    created_at, updated_at \
             FROM pools \
             WHERE id = $1 AND business_id = $2 AND deleted_at IS NULL \
             FOR UPDATE",
        )
        .bind(pool_id)
        .bind(business_id)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(
            |(id, business_id, product_id, status, total_quantity, applied_tier_id, created_at, updated_at)| PoolRow {
                id,
                business_id,
                product_id,
                status,
                total_quantity,
                applied_tier_id,
                created_at,
                updated_at,
            },
        ))
    }

    /// Inserts or updates a membership by its `(pool_id, user_id)` natural
    /// key. A rejoin replaces the contributed quantity (never adds to it)
    /// and revives a soft-deleted membership.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on database failure.
    pub async fn upsert_member(
        &self,
        conn: &mut PgConnection,
        pool_id: PoolId,
        user_id: Uuid,
        quantity: i64,
    ) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO pool_members (pool_id, user_id, quantity) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (pool_id, user_id) DO UPDATE \
             SET quantity = EXCLUDED.quantity, deleted_at = NULL, updated_at = now()",
        )
        .bind(pool_id)
        .bind(user_id)
        .bind(quantity)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Tombstones a membership. Returns `false` if the user has no active
    /// membership in the pool (never joined, or already left).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on database failure.
    pub async fn soft_delete_member(
        &self,
        conn: &mut PgConnection,
        pool_id: PoolId,
        user_id: Uuid,
    ) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "UPDATE pool_members SET deleted_at = now(), updated_at = now() \
             WHERE pool_id = $1 AND user_id = $2 AND deleted_at IS NULL",
        )
        .bind(pool_id)
        .bind(user_id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Recomputes the pool aggregate as the sum over active members.
    ///
    /// Always a full recompute inside the current transaction, never
    /// `total_quantity + delta`, so any prior drift self-heals.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on database failure.
    pub async fn sum_active_member_quantity(
        &self,
        conn: &mut PgConnection,
        pool_id: PoolId,
    ) -> Result<i64, ApiError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM pool_members \
             WHERE pool_id = $1 AND deleted_at IS NULL",
        )
        .bind(pool_id)
        .fetch_one(conn)
        .await?;

        Ok(total)
    }

    /// Loads a product's discount schedule ascending by
    /// `(threshold_quantity, sort_order)`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingTiers`] if the product has no tiers —
    /// a pool created against an unpriced product cannot be repriced.
    pub async fn list_tiers_for_product(
        &self,
        conn: &mut PgConnection,
        product_id: Uuid,
    ) -> Result<Vec<PricingTier>, ApiError> {
        let rows = sqlx::query_as::<_, (TierId, Uuid, i64, i64, i32)>(
            "SELECT id, product_id, threshold_quantity, unit_price_paise, sort_order \
             FROM pricing_tiers \
             WHERE product_id = $1 \
             ORDER BY threshold_quantity ASC, sort_order ASC",
        )
        .bind(product_id)
        .fetch_all(conn)
        .await?;

        if rows.is_empty() {
            return Err(ApiError::MissingTiers(product_id));
        }

        Ok(rows
            .into_iter()
            .map(
                |(id, product_id, threshold_quantity, unit_price_paise, sort_order)| PricingTier {
                    id,
                    product_id,
                    threshold_quantity,
                    unit_price_paise,
                    sort_order,
                },
            )
            .collect())
    }

    /// Records that a tier has been applied to a pool, at most once.
    ///
    /// `ON CONFLICT DO NOTHING` on the `(pool_id, tier_id)` unique key:
    /// if another transaction already applied this exact tier the insert
    /// is a silent no-op, which is the expected, safe race. Downstream
    /// effects keyed off this ledger therefore fire at most once per
    /// (pool, tier) pair even under concurrent retries.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on database failure.
    pub async fn record_price_event_if_absent(
        &self,
        conn: &mut PgConnection,
        pool_id: PoolId,
        tier_id: TierId,
    ) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO pool_price_events (pool_id, tier_id) VALUES ($1, $2) \
             ON CONFLICT (pool_id, tier_id) DO NOTHING",
        )
        .bind(pool_id)
        .bind(tier_id)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Writes the freshly recomputed total and applied-tier pointer back
    /// to the pool row.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on database failure.
    pub async fn update_pool_applied_tier(
        &self,
        conn: &mut PgConnection,
        pool_id: PoolId,
        new_total: i64,
        tier_id: TierId,
    ) -> Result<(), ApiError> {
        sqlx::query(
            "UPDATE pools SET total_quantity = $2, applied_tier_id = $3, updated_at = now() \
             WHERE id = $1",
        )
        .bind(pool_id)
        .bind(new_total)
        .bind(tier_id)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Updates the unit-price snapshot on every active member of the pool.
    ///
    /// Discount benefits are retroactive: all current participants get the
    /// new tier's price, not just the member whose join crossed the
    /// threshold.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on database failure.
    pub async fn update_member_price_snapshots(
        &self,
        conn: &mut PgConnection,
        pool_id: PoolId,
        unit_price_paise: i64,
    ) -> Result<(), ApiError> {
        sqlx::query(
            "UPDATE pool_members SET unit_price_paise = $2, updated_at = now() \
             WHERE pool_id = $1 AND deleted_at IS NULL",
        )
        .bind(pool_id)
        .bind(unit_price_paise)
        .execute(conn)
        .await?;

        Ok(())
    }

    // ── Read paths for the polling endpoints ────────────────────────────

    /// Loads a pool row without locking. Same scoping as
    /// [`find_pool_for_update`](Self::find_pool_for_update).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on database failure.
    pub async fn fetch_pool(
        &self,
        pool_id: PoolId,
        business_id: Uuid,
    ) -> Result<Option<PoolRow>, ApiError> {
        let row = sqlx::query_as::<_, (PoolId, Uuid, Uuid, String, i64, Option<TierId>, DateTime<Utc>, DateTime<Utc>)>(
            "SELECT id, business_id, product_id, status, total_quantity, applied_tier_id, \
                    created_at, updated_at \
             FROM pools \
             WHERE id = $1 AND business_id = $2 AND deleted_at IS NULL",
        )
        .bind(pool_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(id, business_id, product_id, status, total_quantity, applied_tier_id, created_at, updated_at)| PoolRow {
                id,
                business_id,
                product_id,
                status,
                total_quantity,
                applied_tier_id,
                created_at,
                updated_at,
            },
        ))
    }

    /// Lists the pool's active members ordered by first-join time.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on database failure.
    pub async fn list_active_members(&self, pool_id: PoolId) -> Result<Vec<MemberRow>, ApiError> {
        let rows = sqlx::query_as::<_, (Uuid, i64, Option<i64>, DateTime<Utc>, DateTime<Utc>)>(
            "SELECT user_id, quantity, unit_price_paise, created_at, updated_at \
             FROM pool_members \
             WHERE pool_id = $1 AND deleted_at IS NULL \
             ORDER BY created_at ASC",
        )
        .bind(pool_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(user_id, quantity, unit_price_paise, created_at, updated_at)| MemberRow {
                    user_id,
                    quantity,
                    unit_price_paise,
                    created_at,
                    updated_at,
                },
            )
            .collect())
    }

    /// Loads a single tier by id, for resolving a pool's applied-tier
    /// pointer on the read path.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on database failure.
    pub async fn fetch_tier(&self, tier_id: TierId) -> Result<Option<PricingTier>, ApiError> {
        let row = sqlx::query_as::<_, (TierId, Uuid, i64, i64, i32)>(
            "SELECT id, product_id, threshold_quantity, unit_price_paise, sort_order \
             FROM pricing_tiers WHERE id = $1",
        )
        .bind(tier_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(id, product_id, threshold_quantity, unit_price_paise, sort_order)| PricingTier {
                id,
                product_id,
                threshold_quantity,
                unit_price_paise,
                sort_order,
            },
        ))
    }
}
