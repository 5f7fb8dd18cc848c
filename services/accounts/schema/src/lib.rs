//! sea-orm entities for the accounts service.

pub mod accounts;
pub mod activation_tokens;
pub mod phone_whitelist;
pub mod verification_tokens;
