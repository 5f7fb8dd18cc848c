use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::error::AccountsServiceError;
use crate::handlers::profile::AccountResponse;
use crate::state::AppState;
use crate::usecase::activation::{
    ActivateInput, ActivateUseCase, ResendActivationInput, ResendActivationUseCase,
};

// ── POST /accounts/activation ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ActivateRequest {
    pub phone: String,
    pub code: String,
}

pub async fn activate(
    State(state): State<AppState>,
    Json(body): Json<ActivateRequest>,
) -> Result<Json<AccountResponse>, AccountsServiceError> {
    let usecase = ActivateUseCase {
        accounts: state.account_repo(),
        activation_tokens: state.activation_token_repo(),
    };
    let account = usecase
        .execute(ActivateInput {
            phone: body.phone,
            code: body.code,
        })
        .await?;
    Ok(Json(account.into()))
}

// ── POST /accounts/activation/resend ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResendCodeRequest {
    pub phone: String,
}

pub async fn resend_code(
    State(state): State<AppState>,
    Json(body): Json<ResendCodeRequest>,
) -> Result<StatusCode, AccountsServiceError> {
    let usecase = ResendActivationUseCase {
        accounts: state.account_repo(),
        activation_tokens: state.activation_token_repo(),
        sms: state.sms_gateway(),
    };
    usecase
        .execute(ResendActivationInput { phone: body.phone })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
