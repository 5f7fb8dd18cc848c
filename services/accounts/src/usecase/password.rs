use chrono::Utc;
use uuid::Uuid;

use aquabill_domain::phone;

use crate::domain::repository::{
    AccountRepository, SmsGateway, VerificationTokenRepository,
};
use crate::domain::types::{VerificationPurpose, VerificationToken};
use crate::error::AccountsServiceError;
use crate::password::{hash_password, validate_new_password, verify_password};
use crate::usecase::check_verification_code;

// ── Request password reset (unauthenticated) ─────────────────────────────────

pub struct RequestPasswordResetInput {
    pub phone: String,
}

#[derive(Debug)]
pub struct RequestPasswordResetOutput {
    /// Public token handle, absent when the phone is unknown. The HTTP
    /// response is identical either way so the endpoint cannot be used to
    /// probe which numbers are registered.
    pub token: Option<Uuid>,
}

pub struct RequestPasswordResetUseCase<A, V, S>
where
    A: AccountRepository,
    V: VerificationTokenRepository,
    S: SmsGateway,
{
    pub accounts: A,
    pub verification_tokens: V,
    pub sms: S,
}

impl<A, V, S> RequestPasswordResetUseCase<A, V, S>
where
    A: AccountRepository,
    V: VerificationTokenRepository,
    S: SmsGateway,
{
    pub async fn execute(
        &self,
        input: RequestPasswordResetInput,
    ) -> Result<RequestPasswordResetOutput, AccountsServiceError> {
        let phone =
            phone::canonicalize(&input.phone).ok_or(AccountsServiceError::InvalidPhone)?;

        let Some(account) = self.accounts.find_by_phone(&phone).await? else {
            tracing::info!("password reset requested for unknown phone");
            return Ok(RequestPasswordResetOutput { token: None });
        };

        let (token, code) = VerificationToken::issue(
            VerificationPurpose::PasswordReset,
            Some(account.id),
            &account.phone,
            Utc::now(),
        );

        self.sms
            .send_verification_code(
                &account.phone,
                &code,
                VerificationPurpose::PasswordReset,
                token.id,
            )
            .await?;
        self.verification_tokens.create_superseding(&token).await?;

        tracing::info!(phone = %account.phone, "password reset code sent");
        Ok(RequestPasswordResetOutput {
            token: Some(token.id),
        })
    }
}

// ── Confirm password reset ───────────────────────────────────────────────────

pub struct ConfirmPasswordResetInput {
    pub token: Uuid,
    pub code: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

pub struct ConfirmPasswordResetUseCase<A, V, S>
where
    A: AccountRepository,
    V: VerificationTokenRepository,
    S: SmsGateway,
{
    pub accounts: A,
    pub verification_tokens: V,
    pub sms: S,
}

impl<A, V, S> ConfirmPasswordResetUseCase<A, V, S>
where
    A: AccountRepository,
    V: VerificationTokenRepository,
    S: SmsGateway,
{
    pub async fn execute(
        &self,
        input: ConfirmPasswordResetInput,
    ) -> Result<(), AccountsServiceError> {
        validate_new_password(&input.new_password, &input.new_password_confirm)?;

        let token = self
            .verification_tokens
            .find_usable(input.token, VerificationPurpose::PasswordReset)
            .await?
            .ok_or(AccountsServiceError::VerificationTokenNotFound)?;

        check_verification_code(&self.verification_tokens, &token, &input.code).await?;

        let account_id = token
            .account_id
            .ok_or(AccountsServiceError::AccountNotFound)?;
        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AccountsServiceError::AccountNotFound)?;

        self.accounts
            .set_password_hash(account.id, &hash_password(&input.new_password)?)
            .await?;
        self.verification_tokens.mark_used(token.id).await?;

        // Best effort only; the reset already happened.
        if let Err(e) = self
            .sms
            .send_confirmation(&account.phone, VerificationPurpose::PasswordReset, None)
            .await
        {
            tracing::warn!(error = %e, phone = %account.phone, "confirmation sms failed");
        }

        tracing::info!(phone = %account.phone, "password reset completed");
        Ok(())
    }
}

// ── Request password change (authenticated) ──────────────────────────────────

pub struct RequestPasswordChangeInput {
    pub account_id: Uuid,
    pub current_password: String,
}

#[derive(Debug)]
pub struct RequestPasswordChangeOutput {
    pub token: Uuid,
}

pub struct RequestPasswordChangeUseCase<A, V, S>
where
    A: AccountRepository,
    V: VerificationTokenRepository,
    S: SmsGateway,
{
    pub accounts: A,
    pub verification_tokens: V,
    pub sms: S,
}

impl<A, V, S> RequestPasswordChangeUseCase<A, V, S>
where
    A: AccountRepository,
    V: VerificationTokenRepository,
    S: SmsGateway,
{
    pub async fn execute(
        &self,
        input: RequestPasswordChangeInput,
    ) -> Result<RequestPasswordChangeOutput, AccountsServiceError> {
        let account = self
            .accounts
            .find_by_id(input.account_id)
            .await?
            .ok_or(AccountsServiceError::AccountNotFound)?;

        if !verify_password(&input.current_password, &account.password_hash) {
            return Err(AccountsServiceError::InvalidCredentials);
        }

        let (token, code) = VerificationToken::issue(
            VerificationPurpose::PasswordChange,
            Some(account.id),
            &account.phone,
            Utc::now(),
        );

        self.sms
            .send_verification_code(
                &account.phone,
                &code,
                VerificationPurpose::PasswordChange,
                token.id,
            )
            .await?;
        self.verification_tokens.create_superseding(&token).await?;

        tracing::info!(phone = %account.phone, "password change code sent");
        Ok(RequestPasswordChangeOutput { token: token.id })
    }
}

// ── Confirm password change ──────────────────────────────────────────────────

pub struct ConfirmPasswordChangeInput {
    pub token: Uuid,
    pub code: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

pub struct ConfirmPasswordChangeUseCase<A, V, S>
where
    A: AccountRepository,
    V: VerificationTokenRepository,
    S: SmsGateway,
{
    pub accounts: A,
    pub verification_tokens: V,
    pub sms: S,
}

impl<A, V, S> ConfirmPasswordChangeUseCase<A, V, S>
where
    A: AccountRepository,
    V: VerificationTokenRepository,
    S: SmsGateway,
{
    pub async fn execute(
        &self,
        input: ConfirmPasswordChangeInput,
    ) -> Result<(), AccountsServiceError> {
        validate_new_password(&input.new_password, &input.new_password_confirm)?;

        let token = self
            .verification_tokens
            .find_usable(input.token, VerificationPurpose::PasswordChange)
            .await?
            .ok_or(AccountsServiceError::VerificationTokenNotFound)?;

        check_verification_code(&self.verification_tokens, &token, &input.code).await?;

        let account_id = token
            .account_id
            .ok_or(AccountsServiceError::AccountNotFound)?;
        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AccountsServiceError::AccountNotFound)?;

        self.accounts
            .set_password_hash(account.id, &hash_password(&input.new_password)?)
            .await?;
        self.verification_tokens.mark_used(token.id).await?;

        if let Err(e) = self
            .sms
            .send_confirmation(&account.phone, VerificationPurpose::PasswordChange, None)
            .await
        {
            tracing::warn!(error = %e, phone = %account.phone, "confirmation sms failed");
        }

        tracing::info!(phone = %account.phone, "password changed");
        Ok(())
    }
}
