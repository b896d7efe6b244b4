//! DTOs for the join/leave repricing operations.

use serde::{Deserialize, Serialize};

use crate::domain::{PoolId, PricingTier, TierId};
use crate::service::RepriceOutcome;

/// Request body for `POST /v1/pools/{pool_id}/join`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct JoinPoolRequest {
    /// Quantity the caller contributes to the pool. Must be a positive
    /// integer; a rejoin replaces the previous contribution.
    pub quantity: i64,
}

/// The applied tier as returned to callers.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppliedTierDto {
    /// Tier identifier.
    pub id: TierId,
    /// Aggregate quantity at which this tier unlocks.
    pub threshold_quantity: i64,
    /// Unit price in paise for every active member.
    pub unit_price_paise: i64,
}

impl From<&PricingTier> for AppliedTierDto {
    fn from(tier: &PricingTier) -> Self {
        Self {
            id: tier.id,
            threshold_quantity: tier.threshold_quantity,
            unit_price_paise: tier.unit_price_paise,
        }
    }
}

/// Payload of a successful reprice response.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepriceData {
    /// Pool that was repriced.
    pub pool_id: PoolId,
    /// Aggregate quantity after the membership change.
    pub total_quantity: i64,
    /// Tier now in effect for every active member.
    pub applied_tier: AppliedTierDto,
}

/// Response body for join/leave (200 OK).
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RepriceResponse {
    /// Always `true` for success responses.
    pub ok: bool,
    /// Repricing outcome.
    pub data: RepriceData,
}

impl From<RepriceOutcome> for RepriceResponse {
    fn from(outcome: RepriceOutcome) -> Self {
        Self {
            ok: true,
            data: RepriceData {
                pool_id: outcome.pool_id,
                total_quantity: outcome.total_quantity,
                applied_tier: AppliedTierDto::from(&outcome.applied_tier),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn reprice_response_serializes_with_camel_case_envelope() {
        let outcome = RepriceOutcome {
            pool_id: PoolId::new(),
            total_quantity: 1000,
            applied_tier: PricingTier {
                id: TierId::from_uuid(Uuid::new_v4()),
                product_id: Uuid::new_v4(),
                threshold_quantity: 1000,
                unit_price_paise: 4700,
                sort_order: 1,
            },
        };

        let Ok(json) = serde_json::to_value(RepriceResponse::from(outcome)) else {
            panic!("serialization failed");
        };
        assert_eq!(json.get("ok"), Some(&serde_json::json!(true)));
        let Some(data) = json.get("data") else {
            panic!("missing data");
        };
        assert_eq!(data.get("totalQuantity"), Some(&serde_json::json!(1000)));
        assert!(data.get("poolId").is_some());
        let Some(tier) = data.get("appliedTier") else {
            panic!("missing appliedTier");
        };
        assert_eq!(tier.get("thresholdQuantity"), Some(&serde_json::json!(1000)));
        assert_eq!(tier.get("unitPricePaise"), Some(&serde_json::json!(4700)));
        // Internal ordering detail, never exposed.
        assert!(tier.get("sortOrder").is_none());
        assert!(tier.get("sort_order").is_none());
    }

    #[test]
    fn join_request_deserializes_quantity() {
        let Ok(req) = serde_json::from_str::<JoinPoolRequest>(r#"{"quantity": 42}"#) else {
            panic!("deserialization failed");
        };
        assert_eq!(req.quantity, 42);
    }

    #[test]
    fn join_request_rejects_fractional_quantity() {
        assert!(serde_json::from_str::<JoinPoolRequest>(r#"{"quantity": 1.5}"#).is_err());
    }
}
