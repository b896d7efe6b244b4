//! Pool repricing handlers: join, leave, and the polling read.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{JoinPoolRequest, PoolDetailResponse, RepriceResponse};
use crate::app_state::AppState;
use crate::domain::PoolId;
use crate::error::{ApiError, ErrorResponse};

/// Header carrying the caller's business id, resolved by the upstream
/// auth layer before the request reaches this core.
const BUSINESS_ID_HEADER: &str = "x-business-id";
/// Header carrying the caller's user id, resolved upstream.
const USER_ID_HEADER: &str = "x-user-id";

/// `POST /v1/pools/{pool_id}/join` — Join a pool and reprice all members.
///
/// # Errors
///
/// Returns [`ApiError`] for invalid quantity, unknown pool, non-open
/// pool, unpriced product, or a lost serialization race (retryable).
#[utoipa::path(
    post,
    path = "/v1/pools/{pool_id}/join",
    tag = "Pools",
    summary = "Join a pool and reprice",
    description = "Upserts the caller's membership with the given quantity, recomputes the pool aggregate, selects the best eligible pricing tier, and applies its unit price to every active member. Runs as one serializable transaction; on a 503 the caller should retry the identical request.",
    request_body = JoinPoolRequest,
    params(
        ("pool_id" = uuid::Uuid, Path, description = "Pool UUID"),
    ),
    responses(
        (status = 200, description = "Pool repriced", body = RepriceResponse),
        (status = 400, description = "Invalid quantity or identity headers", body = ErrorResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
        (status = 409, description = "Pool not open or product unpriced", body = ErrorResponse),
        (status = 503, description = "Serialization conflict, retry", body = ErrorResponse),
    )
)]
pub async fn join_pool(
    State(state): State<AppState>,
    Path(pool_id): Path<uuid::Uuid>,
    headers: HeaderMap,
    Json(req): Json<JoinPoolRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let business_id = identity_header(&headers, BUSINESS_ID_HEADER)?;
    let user_id = identity_header(&headers, USER_ID_HEADER)?;

    let outcome = state
        .pricing_service
        .join_pool_and_reprice(business_id, PoolId::from_uuid(pool_id), user_id, req.quantity)
        .await?;

    Ok(Json(RepriceResponse::from(outcome)))
}

/// `POST /v1/pools/{pool_id}/leave` — Leave a pool and reprice the rest.
///
/// # Errors
///
/// Returns [`ApiError`] for unknown pool/membership, non-open pool, or a
/// lost serialization race (retryable).
#[utoipa::path(
    post,
    path = "/v1/pools/{pool_id}/leave",
    tag = "Pools",
    summary = "Leave a pool and reprice",
    description = "Soft-deletes the caller's membership and reprices the remaining members from the recomputed aggregate. The applied tier can regress if the pool drops below a previously crossed threshold.",
    params(
        ("pool_id" = uuid::Uuid, Path, description = "Pool UUID"),
    ),
    responses(
        (status = 200, description = "Pool repriced", body = RepriceResponse),
        (status = 404, description = "Pool or membership not found", body = ErrorResponse),
        (status = 409, description = "Pool not open", body = ErrorResponse),
        (status = 503, description = "Serialization conflict, retry", body = ErrorResponse),
    )
)]
pub async fn leave_pool(
    State(state): State<AppState>,
    Path(pool_id): Path<uuid::Uuid>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let business_id = identity_header(&headers, BUSINESS_ID_HEADER)?;
    let user_id = identity_header(&headers, USER_ID_HEADER)?;

    let outcome = state
        .pricing_service
        .leave_pool_and_reprice(business_id, PoolId::from_uuid(pool_id), user_id)
        .await?;

    Ok(Json(RepriceResponse::from(outcome)))
}

/// `GET /v1/pools/{pool_id}` — Pool detail for the polling caller.
///
/// # Errors
///
/// Returns [`ApiError::PoolNotFound`] if the pool does not exist or
/// belongs to another business.
#[utoipa::path(
    get,
    path = "/v1/pools/{pool_id}",
    tag = "Pools",
    summary = "Get pool detail",
    description = "Returns the pool's status, aggregate quantity, applied tier, and active members. The surrounding application polls this for price changes.",
    params(
        ("pool_id" = uuid::Uuid, Path, description = "Pool UUID"),
    ),
    responses(
        (status = 200, description = "Pool detail", body = PoolDetailResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
    )
)]
pub async fn get_pool(
    State(state): State<AppState>,
    Path(pool_id): Path<uuid::Uuid>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let business_id = identity_header(&headers, BUSINESS_ID_HEADER)?;

    let detail = state
        .pricing_service
        .get_pool(business_id, PoolId::from_uuid(pool_id))
        .await?;

    Ok(Json(PoolDetailResponse::from(detail)))
}

/// Pool repricing routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pools/{pool_id}/join", post(join_pool))
        .route("/pools/{pool_id}/leave", post(leave_pool))
        .route("/pools/{pool_id}", get(get_pool))
}

/// Extracts a UUID identity header resolved by the upstream auth layer.
fn identity_header(headers: &HeaderMap, name: &str) -> Result<Uuid, ApiError> {
    let raw = headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Validation(format!("missing {name} header")))?;

    Uuid::parse_str(raw).map_err(|_| ApiError::Validation(format!("invalid {name} header")))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn identity_header_parses_uuid() {
        let uuid = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        let Ok(value) = HeaderValue::from_str(&uuid.to_string()) else {
            panic!("header value");
        };
        headers.insert(BUSINESS_ID_HEADER, value);

        let Ok(parsed) = identity_header(&headers, BUSINESS_ID_HEADER) else {
            panic!("expected parse success");
        };
        assert_eq!(parsed, uuid);
    }

    #[test]
    fn missing_identity_header_is_validation_error() {
        let headers = HeaderMap::new();
        let Err(err) = identity_header(&headers, USER_ID_HEADER) else {
            panic!("expected error");
        };
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn malformed_identity_header_is_validation_error() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("not-a-uuid"));

        let Err(err) = identity_header(&headers, USER_ID_HEADER) else {
            panic!("expected error");
        };
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
