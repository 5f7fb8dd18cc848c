//! Shared domain types for aquabill services.

pub mod phone;
pub mod role;
