//! JWT access-token types shared across aquabill services.

pub mod identity;
pub mod token;
