use chrono::Utc;

use crate::domain::repository::VerificationTokenRepository;
use crate::domain::types::{CodeCheck, MAX_CODE_ATTEMPTS, VerificationToken};
use crate::error::AccountsServiceError;

pub mod activation;
pub mod password;
pub mod phone_change;
pub mod profile;
pub mod register;
pub mod token;
pub mod whitelist;

/// Shared code check for verification tokens: maps the outcome to an error
/// and persists the attempt bump on a mismatch.
pub(crate) async fn check_verification_code<V: VerificationTokenRepository>(
    tokens: &V,
    token: &VerificationToken,
    candidate: &str,
) -> Result<(), AccountsServiceError> {
    match token.verify(candidate, Utc::now()) {
        CodeCheck::Valid => Ok(()),
        CodeCheck::Expired => Err(AccountsServiceError::CodeExpired),
        CodeCheck::Locked => Err(AccountsServiceError::TokenLocked),
        CodeCheck::Mismatch => {
            let attempts = token.attempts + 1;
            tokens
                .record_failed_attempt(token.id, attempts, attempts >= MAX_CODE_ATTEMPTS)
                .await?;
            Err(AccountsServiceError::InvalidCode)
        }
    }
}
