use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aquabill_auth_types::identity::Identity;

use crate::error::AccountsServiceError;
use crate::infra::sms::scrub_token;
use crate::state::AppState;
use crate::usecase::password::{
    ConfirmPasswordChangeInput, ConfirmPasswordChangeUseCase, ConfirmPasswordResetInput,
    ConfirmPasswordResetUseCase, RequestPasswordChangeInput, RequestPasswordChangeUseCase,
    RequestPasswordResetInput, RequestPasswordResetUseCase,
};

/// Parse a token handle pasted out of an SMS link, tolerating invisible
/// characters some clients append.
fn parse_token(raw: &str) -> Result<Uuid, AccountsServiceError> {
    Uuid::parse_str(&scrub_token(raw))
        .map_err(|_| AccountsServiceError::VerificationTokenNotFound)
}

// ── POST /auth/password/reset (forgot, unauthenticated) ──────────────────────

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub phone: String,
}

#[derive(Serialize)]
pub struct ForgotPasswordResponse {
    /// Always the same message; the endpoint never reveals whether the phone
    /// is registered.
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AccountsServiceError> {
    let usecase = RequestPasswordResetUseCase {
        accounts: state.account_repo(),
        verification_tokens: state.verification_token_repo(),
        sms: state.sms_gateway(),
    };
    let out = usecase
        .execute(RequestPasswordResetInput { phone: body.phone })
        .await?;

    Ok(Json(ForgotPasswordResponse {
        message: "If this number is linked to an account, a code has been sent by SMS.",
        token: out.token.map(|t| t.to_string()),
    }))
}

// ── PATCH /auth/password/reset (confirm) ─────────────────────────────────────

#[derive(Deserialize)]
pub struct ConfirmPasswordResetRequest {
    pub token: String,
    pub code: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(body): Json<ConfirmPasswordResetRequest>,
) -> Result<StatusCode, AccountsServiceError> {
    let token = parse_token(&body.token)?;
    let usecase = ConfirmPasswordResetUseCase {
        accounts: state.account_repo(),
        verification_tokens: state.verification_token_repo(),
        sms: state.sms_gateway(),
    };
    usecase
        .execute(ConfirmPasswordResetInput {
            token,
            code: body.code,
            new_password: body.new_password,
            new_password_confirm: body.new_password_confirm,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /auth/password/change (request, authenticated) ──────────────────────

#[derive(Deserialize)]
pub struct RequestPasswordChangeRequest {
    pub current_password: String,
}

#[derive(Serialize)]
pub struct RequestPasswordChangeResponse {
    pub token: String,
}

pub async fn request_password_change(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<RequestPasswordChangeRequest>,
) -> Result<(StatusCode, Json<RequestPasswordChangeResponse>), AccountsServiceError> {
    let usecase = RequestPasswordChangeUseCase {
        accounts: state.account_repo(),
        verification_tokens: state.verification_token_repo(),
        sms: state.sms_gateway(),
    };
    let out = usecase
        .execute(RequestPasswordChangeInput {
            account_id: identity.account_id,
            current_password: body.current_password,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RequestPasswordChangeResponse {
            token: out.token.to_string(),
        }),
    ))
}

// ── PATCH /auth/password/change (confirm) ────────────────────────────────────

#[derive(Deserialize)]
pub struct ConfirmPasswordChangeRequest {
    pub token: String,
    pub code: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

pub async fn confirm_password_change(
    State(state): State<AppState>,
    Json(body): Json<ConfirmPasswordChangeRequest>,
) -> Result<StatusCode, AccountsServiceError> {
    let token = parse_token(&body.token)?;
    let usecase = ConfirmPasswordChangeUseCase {
        accounts: state.account_repo(),
        verification_tokens: state.verification_token_repo(),
        sms: state.sms_gateway(),
    };
    usecase
        .execute(ConfirmPasswordChangeInput {
            token,
            code: body.code,
            new_password: body.new_password,
            new_password_confirm: body.new_password_confirm,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
