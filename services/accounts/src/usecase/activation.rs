use chrono::Utc;

use aquabill_domain::phone;

use crate::domain::repository::{AccountRepository, ActivationTokenRepository, SmsGateway};
use crate::domain::types::{
    Account, ActivationToken, CODE_TTL_MINUTES, CodeCheck, MAX_CODE_ATTEMPTS, ResendDecision,
    generate_code, hash_code,
};
use crate::error::AccountsServiceError;

// ── Activate ─────────────────────────────────────────────────────────────────

pub struct ActivateInput {
    pub phone: String,
    pub code: String,
}

pub struct ActivateUseCase<A, T>
where
    A: AccountRepository,
    T: ActivationTokenRepository,
{
    pub accounts: A,
    pub activation_tokens: T,
}

impl<A, T> ActivateUseCase<A, T>
where
    A: AccountRepository,
    T: ActivationTokenRepository,
{
    /// Consume an activation code. On success the account flips to active and
    /// the token is deleted, in one transaction.
    pub async fn execute(&self, input: ActivateInput) -> Result<Account, AccountsServiceError> {
        let phone =
            phone::canonicalize(&input.phone).ok_or(AccountsServiceError::InvalidPhone)?;

        let account = self
            .accounts
            .find_by_phone(&phone)
            .await?
            .ok_or(AccountsServiceError::AccountNotFound)?;
        if account.is_active {
            return Err(AccountsServiceError::AlreadyActive);
        }

        let token = self
            .activation_tokens
            .find_by_account(account.id)
            .await?
            .ok_or(AccountsServiceError::NoPendingActivation)?;

        let now = Utc::now();
        match token.verify(&input.code, now) {
            CodeCheck::Valid => {}
            CodeCheck::Expired => return Err(AccountsServiceError::CodeExpired),
            CodeCheck::Locked => return Err(AccountsServiceError::TokenLocked),
            CodeCheck::Mismatch => {
                let attempts = token.attempts + 1;
                self.activation_tokens
                    .record_failed_attempt(token.id, attempts, attempts >= MAX_CODE_ATTEMPTS)
                    .await?;
                return Err(AccountsServiceError::InvalidCode);
            }
        }

        self.accounts.activate(account.id, token.id).await?;
        tracing::info!(phone = %account.phone, "account activated");

        Ok(Account {
            is_active: true,
            ..account
        })
    }
}

// ── Resend activation code ───────────────────────────────────────────────────

pub struct ResendActivationInput {
    pub phone: String,
}

pub struct ResendActivationUseCase<A, T, S>
where
    A: AccountRepository,
    T: ActivationTokenRepository,
    S: SmsGateway,
{
    pub accounts: A,
    pub activation_tokens: T,
    pub sms: S,
}

impl<A, T, S> ResendActivationUseCase<A, T, S>
where
    A: AccountRepository,
    T: ActivationTokenRepository,
    S: SmsGateway,
{
    /// Send a fresh activation code, subject to the cooldown and daily quota.
    ///
    /// Counters advance only after a successful send, so a gateway outage does
    /// not eat into the quota.
    pub async fn execute(
        &self,
        input: ResendActivationInput,
    ) -> Result<(), AccountsServiceError> {
        let phone =
            phone::canonicalize(&input.phone).ok_or(AccountsServiceError::InvalidPhone)?;

        let account = self
            .accounts
            .find_by_phone(&phone)
            .await?
            .ok_or(AccountsServiceError::AccountNotFound)?;
        if account.is_active {
            return Err(AccountsServiceError::AlreadyActive);
        }

        let now = Utc::now();
        match self.activation_tokens.find_by_account(account.id).await? {
            Some(existing) => {
                if existing.is_locked {
                    return Err(AccountsServiceError::TokenLocked);
                }
                let send_count = match existing.resend_decision(now) {
                    ResendDecision::Allowed { quota_reset: true } => 1,
                    ResendDecision::Allowed { quota_reset: false } => existing.send_count + 1,
                    ResendDecision::Cooldown => {
                        return Err(AccountsServiceError::ResendCooldown);
                    }
                    ResendDecision::QuotaExceeded => {
                        return Err(AccountsServiceError::ResendQuotaExceeded);
                    }
                };

                let code = generate_code();
                self.sms.send_activation_code(&phone, &code).await?;

                let updated = ActivationToken {
                    code_hash: hash_code(&code),
                    expires_at: now + chrono::Duration::minutes(CODE_TTL_MINUTES),
                    attempts: 0,
                    last_sent_at: now,
                    send_count,
                    ..existing
                };
                self.activation_tokens.update_for_resend(&updated).await?;
            }
            None => {
                // No pending token for this account, issue a fresh one.
                let (token, code) = ActivationToken::issue(account.id, now);
                self.sms.send_activation_code(&phone, &code).await?;
                self.activation_tokens.replace(&token).await?;
            }
        }

        tracing::info!(phone = %account.phone, "activation code resent");
        Ok(())
    }
}
