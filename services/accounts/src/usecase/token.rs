use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use aquabill_auth_types::token::{
    ACCESS_TOKEN_EXP, JwtClaims, REFRESH_TOKEN_EXP, validate_token,
};
use aquabill_domain::phone;

use crate::domain::repository::AccountRepository;
use crate::domain::types::Account;
use crate::error::AccountsServiceError;
use crate::password::verify_password;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

pub fn issue_access_token(
    account: &Account,
    secret: &str,
) -> Result<(String, u64), AccountsServiceError> {
    let exp = now_secs() + ACCESS_TOKEN_EXP;
    let claims = JwtClaims {
        sub: account.id.to_string(),
        role: account.role,
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AccountsServiceError::Internal(e.into()))?;
    Ok((token, exp))
}

pub fn issue_refresh_token(
    account: &Account,
    secret: &str,
) -> Result<String, AccountsServiceError> {
    let exp = now_secs() + REFRESH_TOKEN_EXP;
    let claims = JwtClaims {
        sub: account.id.to_string(),
        role: account.role,
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AccountsServiceError::Internal(e.into()))
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub phone: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub account: Account,
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

pub struct LoginUseCase<A: AccountRepository> {
    pub accounts: A,
    pub jwt_secret: String,
}

impl<A: AccountRepository> LoginUseCase<A> {
    /// Authenticate by phone + password and issue a JWT pair.
    ///
    /// Unknown phone, wrong password and inactive account all fail with the
    /// same error, so callers cannot probe which numbers are registered.
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AccountsServiceError> {
        let phone = phone::normalize(&input.phone)
            .ok_or(AccountsServiceError::InvalidCredentials)?;

        let account = self
            .accounts
            .find_by_phone(&phone)
            .await?
            .ok_or(AccountsServiceError::InvalidCredentials)?;

        if !verify_password(&input.password, &account.password_hash) || !account.is_active {
            return Err(AccountsServiceError::InvalidCredentials);
        }

        let now = Utc::now();
        self.accounts.record_login(account.id, now).await?;

        let (access_token, access_token_exp) = issue_access_token(&account, &self.jwt_secret)?;
        let refresh_token = issue_refresh_token(&account, &self.jwt_secret)?;

        Ok(LoginOutput {
            account: Account {
                last_login: Some(now),
                ..account
            },
            access_token,
            access_token_exp,
            refresh_token,
        })
    }
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct RefreshTokenOutput {
    pub account_id: Uuid,
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

pub struct RefreshTokenUseCase<A: AccountRepository> {
    pub accounts: A,
    pub jwt_secret: String,
}

impl<A: AccountRepository> RefreshTokenUseCase<A> {
    pub async fn execute(
        &self,
        refresh_token_value: &str,
    ) -> Result<RefreshTokenOutput, AccountsServiceError> {
        // Validate refresh token (sig + exp); expired access token is irrelevant here.
        let claims = validate_token(refresh_token_value, &self.jwt_secret)
            .map_err(|_| AccountsServiceError::InvalidRefreshToken)?;

        let account_id = claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| AccountsServiceError::InvalidRefreshToken)?;

        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AccountsServiceError::InvalidRefreshToken)?;

        let (access_token, access_token_exp) = issue_access_token(&account, &self.jwt_secret)?;
        let refresh_token = issue_refresh_token(&account, &self.jwt_secret)?;

        Ok(RefreshTokenOutput {
            account_id: account.id,
            access_token,
            access_token_exp,
            refresh_token,
        })
    }
}
