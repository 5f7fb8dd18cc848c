//! Test utilities for aquabill services.
//!
//! Provides bearer-token minting for authenticated test requests.
//! Import in `#[cfg(test)]` blocks and integration tests only — never in
//! production code.

pub mod auth;
