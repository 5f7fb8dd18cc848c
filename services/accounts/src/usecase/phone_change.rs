use chrono::Utc;
use uuid::Uuid;

use aquabill_domain::phone;

use crate::domain::repository::{
    AccountRepository, SmsGateway, VerificationTokenRepository,
};
use crate::domain::types::{VerificationPurpose, VerificationToken};
use crate::error::AccountsServiceError;
use crate::usecase::check_verification_code;

// ── Request phone change (authenticated) ─────────────────────────────────────

pub struct RequestPhoneChangeInput {
    pub account_id: Uuid,
    pub new_phone: String,
}

#[derive(Debug)]
pub struct RequestPhoneChangeOutput {
    pub token: Uuid,
}

pub struct RequestPhoneChangeUseCase<A, V, S>
where
    A: AccountRepository,
    V: VerificationTokenRepository,
    S: SmsGateway,
{
    pub accounts: A,
    pub verification_tokens: V,
    pub sms: S,
}

impl<A, V, S> RequestPhoneChangeUseCase<A, V, S>
where
    A: AccountRepository,
    V: VerificationTokenRepository,
    S: SmsGateway,
{
    /// Start a phone change. The code goes to the NEW number, proving the
    /// caller controls it before anything moves.
    pub async fn execute(
        &self,
        input: RequestPhoneChangeInput,
    ) -> Result<RequestPhoneChangeOutput, AccountsServiceError> {
        let new_phone =
            phone::canonicalize(&input.new_phone).ok_or(AccountsServiceError::InvalidPhone)?;

        let account = self
            .accounts
            .find_by_id(input.account_id)
            .await?
            .ok_or(AccountsServiceError::AccountNotFound)?;

        if self.accounts.phone_exists(&new_phone).await? {
            return Err(AccountsServiceError::PhoneTaken);
        }

        let (token, code) = VerificationToken::issue(
            VerificationPurpose::PhoneChange,
            Some(account.id),
            &new_phone,
            Utc::now(),
        );

        self.sms
            .send_verification_code(&new_phone, &code, VerificationPurpose::PhoneChange, token.id)
            .await?;
        self.verification_tokens.create_superseding(&token).await?;

        tracing::info!(account_id = %account.id, "phone change code sent to new number");
        Ok(RequestPhoneChangeOutput { token: token.id })
    }
}

// ── Confirm phone change ─────────────────────────────────────────────────────

pub struct ConfirmPhoneChangeInput {
    pub token: Uuid,
    pub code: String,
}

#[derive(Debug)]
pub struct ConfirmPhoneChangeOutput {
    pub new_phone: String,
}

pub struct ConfirmPhoneChangeUseCase<A, V, S>
where
    A: AccountRepository,
    V: VerificationTokenRepository,
    S: SmsGateway,
{
    pub accounts: A,
    pub verification_tokens: V,
    pub sms: S,
}

impl<A, V, S> ConfirmPhoneChangeUseCase<A, V, S>
where
    A: AccountRepository,
    V: VerificationTokenRepository,
    S: SmsGateway,
{
    pub async fn execute(
        &self,
        input: ConfirmPhoneChangeInput,
    ) -> Result<ConfirmPhoneChangeOutput, AccountsServiceError> {
        let token = self
            .verification_tokens
            .find_usable(input.token, VerificationPurpose::PhoneChange)
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

        // The number may have been claimed between request and confirm.
        if self.accounts.phone_exists(&token.phone).await? {
            return Err(AccountsServiceError::PhoneTaken);
        }

        let old_phone = account.phone.clone();
        self.accounts.set_phone(account.id, &token.phone).await?;
        self.verification_tokens.mark_used(token.id).await?;

        // Notify both numbers; failures never undo the change.
        if let Err(e) = self
            .sms
            .send_confirmation(
                &old_phone,
                VerificationPurpose::PhoneChange,
                Some(&format!("Your new number is {}", token.phone)),
            )
            .await
        {
            tracing::warn!(error = %e, "confirmation sms to old number failed");
        }
        if let Err(e) = self
            .sms
            .send_confirmation(
                &token.phone,
                VerificationPurpose::PhoneChange,
                Some("This number is now linked to your account"),
            )
            .await
        {
            tracing::warn!(error = %e, "confirmation sms to new number failed");
        }

        tracing::info!(account_id = %account.id, "phone number changed");
        Ok(ConfirmPhoneChangeOutput {
            new_phone: token.phone,
        })
    }
}
