//! Service error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and a structured JSON error body
//! in the `{ "ok": false, "error": { ... } }` envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::PoolId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "ok": false,
///   "error": {
///     "code": 1001,
///     "message": "quantity must be a positive integer",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Always `false` for error responses.
    pub ok: bool,
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`ApiError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category          | HTTP Status                  |
/// |-----------|-------------------|------------------------------|
/// | 1000–1999 | Validation        | 400 Bad Request              |
/// | 2000–2999 | Not Found         | 404 Not Found                |
/// | 3000–3999 | Server/Transient  | 500 / 503                    |
/// | 4000–4999 | Pool State        | 409 Conflict                 |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request validation failed before any transaction was opened.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Pool does not exist, is soft-deleted, or belongs to another business.
    #[error("pool not found: {0}")]
    PoolNotFound(PoolId),

    /// The caller has no active membership in the pool.
    #[error("user {user_id} is not an active member of pool {pool_id}")]
    MemberNotFound {
        /// Pool the membership was looked up in.
        pool_id: PoolId,
        /// User whose membership is missing or soft-deleted.
        user_id: Uuid,
    },

    /// Pool status is not `OPEN`; the caller must not retry unchanged.
    #[error("pool {pool_id} is not accepting joins (status: {status})")]
    PoolNotOpen {
        /// Pool that rejected the membership change.
        pool_id: PoolId,
        /// Raw status string stored on the pool.
        status: String,
    },

    /// The pool's product has no pricing tiers, or no tier is eligible at
    /// the recomputed total. An unpriced product is a data-integrity fault
    /// upstream of this core, surfaced as a conflict rather than defaulted.
    #[error("product {0} has no eligible pricing tier")]
    MissingTiers(Uuid),

    /// The store aborted the transaction due to a concurrent conflicting
    /// transaction (SQLSTATE 40001). The only variant where blind retry is
    /// correct caller behavior; the core does not retry internally.
    #[error("concurrent update conflict, retry the request")]
    SerializationConflict,

    /// Persistence layer failure. Message is logged, never exposed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error. Message is logged, never exposed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::PoolNotFound(_) => 2001,
            Self::MemberNotFound { .. } => 2002,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::SerializationConflict => 3002,
            Self::PoolNotOpen { .. } => 4001,
            Self::MissingTiers(_) => 4002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::PoolNotFound(_) | Self::MemberNotFound { .. } => StatusCode::NOT_FOUND,
            Self::PoolNotOpen { .. } | Self::MissingTiers(_) => StatusCode::CONFLICT,
            Self::SerializationConflict => StatusCode::SERVICE_UNAVAILABLE,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to the caller. Server-side failures are redacted;
    /// the full message goes to the log only.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Persistence(_) | Self::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // serialization_failure: the serializable transaction lost a
            // race and was aborted by Postgres. Safe to retry verbatim.
            if db_err.code().as_deref() == Some("40001") {
                return Self::SerializationConflict;
            }
        }
        Self::Persistence(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        }
        let body = ErrorResponse {
            ok: false,
            error: ErrorBody {
                code: self.error_code(),
                message: self.public_message(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let err = ApiError::Validation("quantity must be a positive integer".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1001);
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::PoolNotFound(PoolId::new());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2001);

        let err = ApiError::MemberNotFound {
            pool_id: PoolId::new(),
            user_id: Uuid::new_v4(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn pool_state_errors_map_to_409() {
        let err = ApiError::PoolNotOpen {
            pool_id: PoolId::new(),
            status: "LOCKED".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err = ApiError::MissingTiers(Uuid::new_v4());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn serialization_conflict_is_retryable_503() {
        let err = ApiError::SerializationConflict;
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.error_code(), 3002);
    }

    #[test]
    fn server_errors_are_redacted() {
        let err = ApiError::Persistence("connection reset by peer".to_string());
        assert_eq!(err.public_message(), "internal error");

        let err = ApiError::Internal("stack details".to_string());
        assert_eq!(err.public_message(), "internal error");

        let err = ApiError::PoolNotOpen {
            pool_id: PoolId::new(),
            status: "LOCKED".to_string(),
        };
        assert!(err.public_message().contains("LOCKED"));
    }

    #[test]
    fn non_database_sqlx_error_is_persistence() {
        let err = ApiError::from(sqlx::Error::PoolClosed);
        assert!(matches!(err, ApiError::Persistence(_)));
    }

    #[test]
    fn error_body_serializes_with_envelope() {
        let body = ErrorResponse {
            ok: false,
            error: ErrorBody {
                code: 4001,
                message: "pool is not accepting joins".to_string(),
                details: None,
            },
        };
        let Ok(json) = serde_json::to_value(&body) else {
            panic!("serialization failed");
        };
        assert_eq!(json.get("ok"), Some(&serde_json::json!(false)));
        let Some(error) = json.get("error") else {
            panic!("missing error object");
        };
        assert_eq!(error.get("code"), Some(&serde_json::json!(4001)));
        assert!(error.get("details").is_none());
    }
}
