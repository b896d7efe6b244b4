//! # groupbuy-gateway
//!
//! Pool repricing core and REST gateway for a group-buying marketplace.
//!
//! Buyers pool demand for a product until volume thresholds unlock
//! supplier-negotiated discount tiers. This crate owns the one subsystem
//! with real concurrency risk: joining a pool and repricing every member
//! consistently while many joins race. Everything else (auth, onboarding,
//! messaging, notifications) lives in the surrounding application and
//! talks to this core over plain HTTP.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── PricingService (service/)
//!     │     one SERIALIZABLE transaction per join/leave
//!     │
//!     ├── Domain (domain/)
//!     │     tier selection, pool status
//!     │
//!     └── PostgresPoolStore (persistence/)
//!           unique constraints carry the concurrency invariants
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
