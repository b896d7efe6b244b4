//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::PricingService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Pricing service for all repricing logic.
    pub pricing_service: Arc<PricingService>,
}
