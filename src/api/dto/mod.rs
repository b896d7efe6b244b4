//! Data Transfer Objects for REST request/response serialization.
//!
//! Success responses wrap their payload in `{ "ok": true, "data": ... }`;
//! the matching error envelope lives in [`crate::error`]. All money is
//! integer paise, never floating point.

pub mod join_dto;
pub mod pool_dto;

pub use join_dto::*;
pub use pool_dto::*;
