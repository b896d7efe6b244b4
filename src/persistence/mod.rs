//! Persistence layer: the PostgreSQL pool aggregate store.
//!
//! Durable, constraint-enforced storage for pools, memberships, pricing
//! tiers, and the price-event idempotency ledger. The schema (see
//! `migrations/`) carries the concurrency invariants; this module is a
//! thin, transaction-composable wrapper over `sqlx::PgPool`.

pub mod models;
pub mod postgres;

pub use models::{MemberRow, PoolRow};
pub use postgres::PostgresPoolStore;
