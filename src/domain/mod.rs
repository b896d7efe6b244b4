//! Domain layer: identifiers, pool status, and the tier-selection rule.
//!
//! Pure types and logic shared by the persistence and service layers.
//! Nothing here touches the database; the selection rule in [`tier`] is
//! deliberately a pure function so its properties are unit-testable
//! without a running Postgres.

pub mod ids;
pub mod pool;
pub mod tier;

pub use ids::{PoolId, TierId};
pub use pool::PoolStatus;
pub use tier::{PricingTier, select_tier};
