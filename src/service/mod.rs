//! Service layer: business logic orchestration.
//!
//! [`PricingService`] owns the join/leave-and-reprice transactions and
//! the pool read path, delegating durable state and all concurrency
//! primitives to [`crate::persistence::PostgresPoolStore`].

pub mod pricing_service;

pub use pricing_service::{PoolDetail, PricingService, RepriceOutcome};
