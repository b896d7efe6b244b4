//! Pool lifecycle status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a group-buy pool.
///
/// Only [`PoolStatus::Open`] pools accept joins and leaves. The terminal
/// states are entered by business flows outside this core (a lock action,
/// fulfilment, cancellation); the pricing service only ever reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolStatus {
    /// Accepting joins; the only state the pricing service mutates.
    Open,
    /// Locked for supplier fulfilment; no further membership changes.
    Locked,
    /// Order fulfilled and closed.
    Fulfilled,
    /// Cancelled before fulfilment.
    Cancelled,
}

impl PoolStatus {
    /// Parses the database representation. Returns `None` for statuses
    /// this core does not know about, which callers treat as not open.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(Self::Open),
            "LOCKED" => Some(Self::Locked),
            "FULFILLED" => Some(Self::Fulfilled),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Database/API representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Locked => "LOCKED",
            Self::Fulfilled => "FULFILLED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Whether the pool accepts membership changes.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_all_statuses() {
        for status in [
            PoolStatus::Open,
            PoolStatus::Locked,
            PoolStatus::Fulfilled,
            PoolStatus::Cancelled,
        ] {
            assert_eq!(PoolStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn unknown_status_is_none() {
        assert_eq!(PoolStatus::parse("DRAFT"), None);
        assert_eq!(PoolStatus::parse("open"), None);
    }

    #[test]
    fn only_open_accepts_joins() {
        assert!(PoolStatus::Open.is_open());
        assert!(!PoolStatus::Locked.is_open());
        assert!(!PoolStatus::Fulfilled.is_open());
        assert!(!PoolStatus::Cancelled.is_open());
    }
}
