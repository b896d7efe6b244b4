//! DTOs for the pool read (polling) endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::join_dto::AppliedTierDto;
use crate::domain::PoolId;
use crate::service::PoolDetail;

/// One active member in a pool detail response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    /// User holding the membership.
    pub user_id: Uuid,
    /// Quantity contributed.
    pub quantity: i64,
    /// Unit price snapshot from the last reprice.
    pub unit_price_paise: Option<i64>,
    /// First-join timestamp.
    pub joined_at: DateTime<Utc>,
}

/// Payload of `GET /v1/pools/{pool_id}`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolDetailData {
    /// Pool identifier.
    pub pool_id: PoolId,
    /// Catalog product the pool aggregates demand for.
    pub product_id: Uuid,
    /// Lifecycle status string.
    pub status: String,
    /// Denormalized aggregate quantity as of the last reprice.
    pub total_quantity: i64,
    /// Currently applied tier; `null` until the first join.
    pub applied_tier: Option<AppliedTierDto>,
    /// Active members.
    pub members: Vec<MemberDto>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Response body for `GET /v1/pools/{pool_id}` (200 OK).
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PoolDetailResponse {
    /// Always `true` for success responses.
    pub ok: bool,
    /// Pool detail.
    pub data: PoolDetailData,
}

impl From<PoolDetail> for PoolDetailResponse {
    fn from(detail: PoolDetail) -> Self {
        let members = detail
            .members
            .into_iter()
            .map(|m| MemberDto {
                user_id: m.user_id,
                quantity: m.quantity,
                unit_price_paise: m.unit_price_paise,
                joined_at: m.created_at,
            })
            .collect();

        Self {
            ok: true,
            data: PoolDetailData {
                pool_id: detail.pool.id,
                product_id: detail.pool.product_id,
                status: detail.pool.status,
                total_quantity: detail.pool.total_quantity,
                applied_tier: detail.applied_tier.as_ref().map(AppliedTierDto::from),
                members,
                created_at: detail.pool.created_at,
                updated_at: detail.pool.updated_at,
            },
        }
    }
}
