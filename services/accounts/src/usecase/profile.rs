use uuid::Uuid;

use crate::domain::repository::{AccountRepository, ProfileChanges};
use crate::domain::types::Account;
use crate::error::AccountsServiceError;

const MAX_APARTMENT_LEN: usize = 3;

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> GetProfileUseCase<A> {
    pub async fn execute(&self, account_id: Uuid) -> Result<Account, AccountsServiceError> {
        self.accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AccountsServiceError::AccountNotFound)
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> UpdateProfileUseCase<A> {
    pub async fn execute(
        &self,
        account_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Account, AccountsServiceError> {
        if changes.is_empty() {
            return Err(AccountsServiceError::MissingData);
        }
        if changes
            .first_name
            .as_deref()
            .is_some_and(|n| n.trim().is_empty())
            || changes
                .last_name
                .as_deref()
                .is_some_and(|n| n.trim().is_empty())
        {
            return Err(AccountsServiceError::MissingData);
        }
        if changes
            .apartment_name
            .as_deref()
            .is_some_and(|a| a.chars().count() > MAX_APARTMENT_LEN)
        {
            return Err(AccountsServiceError::InvalidApartmentName);
        }

        self.accounts.update_profile(account_id, &changes).await?;
        self.accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AccountsServiceError::AccountNotFound)
    }
}
