#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{
    Account, ActivationToken, VerificationPurpose, VerificationToken, WhitelistEntry,
};
use crate::error::AccountsServiceError;

/// Optional profile field updates. `None` leaves the field untouched.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub apartment_name: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.apartment_name.is_none()
    }
}

/// Repository for accounts.
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AccountsServiceError>;

    /// Find by canonical phone. Callers normalize first.
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, AccountsServiceError>;

    async fn phone_exists(&self, phone: &str) -> Result<bool, AccountsServiceError>;

    /// Insert a new inactive account and its activation token atomically
    /// (same transaction). The SMS must already have been dispatched.
    async fn create_with_activation(
        &self,
        account: &Account,
        token: &ActivationToken,
    ) -> Result<(), AccountsServiceError>;

    /// Activate an account and delete its activation token atomically.
    async fn activate(&self, account_id: Uuid, token_id: Uuid)
    -> Result<(), AccountsServiceError>;

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<(), AccountsServiceError>;

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<(), AccountsServiceError>;

    async fn set_phone(&self, id: Uuid, phone: &str) -> Result<(), AccountsServiceError>;

    async fn record_login(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), AccountsServiceError>;
}

/// Repository for activation tokens.
pub trait ActivationTokenRepository: Send + Sync {
    async fn find_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Option<ActivationToken>, AccountsServiceError>;

    /// Bump the attempt counter after a failed verify; `lock` when the
    /// maximum is reached.
    async fn record_failed_attempt(
        &self,
        id: Uuid,
        attempts: i32,
        lock: bool,
    ) -> Result<(), AccountsServiceError>;

    /// Replace the code and advance the resend counters after a resend.
    async fn update_for_resend(
        &self,
        token: &ActivationToken,
    ) -> Result<(), AccountsServiceError>;

    /// Replace any existing token for the account with a fresh one.
    async fn replace(&self, token: &ActivationToken) -> Result<(), AccountsServiceError>;
}

/// Repository for verification tokens.
pub trait VerificationTokenRepository: Send + Sync {
    /// Insert a new token, deleting prior unused tokens of the same purpose
    /// for the same account (or phone when account is null) in the same
    /// transaction.
    async fn create_superseding(
        &self,
        token: &VerificationToken,
    ) -> Result<(), AccountsServiceError>;

    /// Find an unused token by public handle + purpose.
    async fn find_usable(
        &self,
        id: Uuid,
        purpose: VerificationPurpose,
    ) -> Result<Option<VerificationToken>, AccountsServiceError>;

    async fn record_failed_attempt(
        &self,
        id: Uuid,
        attempts: i32,
        lock: bool,
    ) -> Result<(), AccountsServiceError>;

    async fn mark_used(&self, id: Uuid) -> Result<(), AccountsServiceError>;
}

/// Repository for the registration whitelist.
pub trait WhitelistRepository: Send + Sync {
    /// Whether an active entry exists for the canonical phone.
    async fn is_authorized(&self, phone: &str) -> Result<bool, AccountsServiceError>;

    /// All entries, newest first.
    async fn list(&self) -> Result<Vec<WhitelistEntry>, AccountsServiceError>;

    async fn find_by_phone(
        &self,
        phone: &str,
    ) -> Result<Option<WhitelistEntry>, AccountsServiceError>;

    async fn insert(&self, entry: &WhitelistEntry) -> Result<(), AccountsServiceError>;

    /// Delete by phone. Returns `true` if deleted, `false` if not found.
    async fn remove(&self, phone: &str) -> Result<bool, AccountsServiceError>;
}

/// Port for the SMS transport.
pub trait SmsGateway: Send + Sync {
    /// Whether the transport is currently usable.
    async fn is_available(&self) -> bool;

    async fn send_activation_code(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<(), AccountsServiceError>;

    /// Send a verification code with a purpose-specific redirect link built
    /// from the token's public handle.
    async fn send_verification_code(
        &self,
        phone: &str,
        code: &str,
        purpose: VerificationPurpose,
        token: Uuid,
    ) -> Result<(), AccountsServiceError>;

    /// Post-completion notification. Callers treat failures as non-fatal.
    async fn send_confirmation(
        &self,
        phone: &str,
        purpose: VerificationPurpose,
        detail: Option<&str>,
    ) -> Result<(), AccountsServiceError>;
}
