//! Row models for the pool aggregate store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{PoolId, TierId};

/// A pool row from the `pools` table.
///
/// `total_quantity` is denormalized and recomputed by every repricing
/// transaction; it is never trusted as a source of truth between
/// transactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolRow {
    /// Pool identifier.
    pub id: PoolId,
    /// Business that owns the pool.
    pub business_id: Uuid,
    /// Catalog product the pool aggregates demand for.
    pub product_id: Uuid,
    /// Raw lifecycle status string (`OPEN`, `LOCKED`, ...).
    pub status: String,
    /// Denormalized aggregate of active member quantities.
    pub total_quantity: i64,
    /// Currently applied pricing tier; `NULL` until the first join.
    pub applied_tier_id: Option<TierId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// An active membership row from the `pool_members` table.
///
/// Soft-deleted rows (tombstoned via `deleted_at`) are never surfaced
/// through the store's read paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRow {
    /// User holding the membership.
    pub user_id: Uuid,
    /// Quantity this member contributes to the pool aggregate.
    pub quantity: i64,
    /// Unit price snapshot from the last repricing; `NULL` only if the
    /// row was written outside the pricing service.
    pub unit_price_paise: Option<i64>,
    /// First-join timestamp.
    pub created_at: DateTime<Utc>,
    /// Last rejoin or reprice timestamp.
    pub updated_at: DateTime<Utc>,
}
