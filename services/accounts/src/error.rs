use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Accounts service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AccountsServiceError {
    #[error("account not found")]
    AccountNotFound,
    #[error("phone number not authorized to register")]
    PhoneNotAuthorized,
    #[error("phone number already in use")]
    PhoneTaken,
    #[error("account already active")]
    AlreadyActive,
    #[error("no pending activation")]
    NoPendingActivation,
    #[error("invalid or expired code")]
    InvalidCode,
    #[error("code expired")]
    CodeExpired,
    #[error("too many failed attempts")]
    TokenLocked,
    #[error("wait before requesting a new code")]
    ResendCooldown,
    #[error("daily code limit reached")]
    ResendQuotaExceeded,
    #[error("invalid phone or password")]
    InvalidCredentials,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("verification token not found")]
    VerificationTokenNotFound,
    #[error("invalid phone number")]
    InvalidPhone,
    #[error("password too weak")]
    WeakPassword,
    #[error("password confirmation does not match")]
    PasswordMismatch,
    #[error("missing data")]
    MissingData,
    #[error("apartment name too long")]
    InvalidApartmentName,
    #[error("whitelist entry not found")]
    WhitelistEntryNotFound,
    #[error("sms dispatch failed")]
    SmsFailed,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AccountsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::PhoneNotAuthorized => "PHONE_NOT_AUTHORIZED",
            Self::PhoneTaken => "PHONE_TAKEN",
            Self::AlreadyActive => "ALREADY_ACTIVE",
            Self::NoPendingActivation => "NO_PENDING_ACTIVATION",
            Self::InvalidCode => "INVALID_CODE",
            Self::CodeExpired => "CODE_EXPIRED",
            Self::TokenLocked => "TOKEN_LOCKED",
            Self::ResendCooldown => "RESEND_COOLDOWN",
            Self::ResendQuotaExceeded => "RESEND_QUOTA_EXCEEDED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::VerificationTokenNotFound => "VERIFICATION_TOKEN_NOT_FOUND",
            Self::InvalidPhone => "INVALID_PHONE",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::PasswordMismatch => "PASSWORD_MISMATCH",
            Self::MissingData => "MISSING_DATA",
            Self::InvalidApartmentName => "INVALID_APARTMENT_NAME",
            Self::WhitelistEntryNotFound => "WHITELIST_ENTRY_NOT_FOUND",
            Self::SmsFailed => "SMS_FAILED",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AccountsServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::AccountNotFound
            | Self::NoPendingActivation
            | Self::VerificationTokenNotFound
            | Self::WhitelistEntryNotFound => StatusCode::NOT_FOUND,
            Self::PhoneTaken | Self::AlreadyActive => StatusCode::CONFLICT,
            Self::InvalidCode
            | Self::CodeExpired
            | Self::InvalidCredentials
            | Self::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            Self::TokenLocked => StatusCode::LOCKED,
            Self::ResendCooldown | Self::ResendQuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
            Self::InvalidPhone
            | Self::WeakPassword
            | Self::PasswordMismatch
            | Self::MissingData
            | Self::InvalidApartmentName => StatusCode::BAD_REQUEST,
            Self::PhoneNotAuthorized | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::SmsFailed => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
