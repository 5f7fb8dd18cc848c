use chrono::Utc;
use uuid::Uuid;

use aquabill_domain::phone;

use crate::domain::repository::{AccountRepository, SmsGateway, WhitelistRepository};
use crate::domain::types::{Account, ActivationToken};
use crate::error::AccountsServiceError;
use crate::password::{hash_password, validate_new_password};

/// Maximum apartment-name length in characters.
const MAX_APARTMENT_LEN: usize = 3;

pub struct RegisterInput {
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirm: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub apartment_name: Option<String>,
}

pub struct RegisterUseCase<A, W, S>
where
    A: AccountRepository,
    W: WhitelistRepository,
    S: SmsGateway,
{
    pub accounts: A,
    pub whitelist: W,
    pub sms: S,
}

impl<A, W, S> RegisterUseCase<A, W, S>
where
    A: AccountRepository,
    W: WhitelistRepository,
    S: SmsGateway,
{
    /// Register a new inactive account and dispatch its activation code.
    ///
    /// Nothing is persisted unless the SMS went out: the code is sent first,
    /// then account + activation token are inserted in one transaction.
    pub async fn execute(&self, input: RegisterInput) -> Result<Account, AccountsServiceError> {
        // 1. Validate input
        let phone =
            phone::canonicalize(&input.phone).ok_or(AccountsServiceError::InvalidPhone)?;
        let first_name = input.first_name.trim();
        let last_name = input.last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(AccountsServiceError::MissingData);
        }
        validate_new_password(&input.password, &input.password_confirm)?;
        if let Some(ref apartment) = input.apartment_name {
            if apartment.chars().count() > MAX_APARTMENT_LEN {
                return Err(AccountsServiceError::InvalidApartmentName);
            }
        }

        // 2. Whitelist gate → 403 if the number was never authorized
        if !self.whitelist.is_authorized(&phone).await? {
            return Err(AccountsServiceError::PhoneNotAuthorized);
        }

        // 3. Uniqueness → 409
        if self.accounts.phone_exists(&phone).await? {
            return Err(AccountsServiceError::PhoneTaken);
        }

        // 4. Build the inactive account + activation token
        let now = Utc::now();
        let account = Account {
            id: Uuid::now_v7(),
            phone: phone.clone(),
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            email: input.email,
            address: input.address,
            apartment_name: input.apartment_name,
            password_hash: hash_password(&input.password)?,
            is_active: false,
            role: 0,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        let (token, code) = ActivationToken::issue(account.id, now);

        // 5. Dispatch before persisting: a failed send must leave no rows
        if !self.sms.is_available().await {
            return Err(AccountsServiceError::SmsFailed);
        }
        self.sms.send_activation_code(&phone, &code).await?;

        // 6. Account + token land together or not at all
        self.accounts
            .create_with_activation(&account, &token)
            .await?;

        tracing::info!(phone = %account.phone, "account registered, activation code sent");
        Ok(account)
    }
}
