use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aquabill_auth_types::identity::Identity;

use crate::error::AccountsServiceError;
use crate::infra::sms::scrub_token;
use crate::state::AppState;
use crate::usecase::phone_change::{
    ConfirmPhoneChangeInput, ConfirmPhoneChangeUseCase, RequestPhoneChangeInput,
    RequestPhoneChangeUseCase,
};

// ── POST /accounts/@me/phone (request, authenticated) ────────────────────────

#[derive(Deserialize)]
pub struct RequestPhoneChangeRequest {
    pub new_phone: String,
}

#[derive(Serialize)]
pub struct RequestPhoneChangeResponse {
    pub token: String,
}

pub async fn request_phone_change(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<RequestPhoneChangeRequest>,
) -> Result<(StatusCode, Json<RequestPhoneChangeResponse>), AccountsServiceError> {
    let usecase = RequestPhoneChangeUseCase {
        accounts: state.account_repo(),
        verification_tokens: state.verification_token_repo(),
        sms: state.sms_gateway(),
    };
    let out = usecase
        .execute(RequestPhoneChangeInput {
            account_id: identity.account_id,
            new_phone: body.new_phone,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RequestPhoneChangeResponse {
            token: out.token.to_string(),
        }),
    ))
}

// ── PATCH /accounts/phone (confirm) ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct ConfirmPhoneChangeRequest {
    pub token: String,
    pub code: String,
}

#[derive(Serialize)]
pub struct ConfirmPhoneChangeResponse {
    pub new_phone: String,
}

pub async fn confirm_phone_change(
    State(state): State<AppState>,
    Json(body): Json<ConfirmPhoneChangeRequest>,
) -> Result<Json<ConfirmPhoneChangeResponse>, AccountsServiceError> {
    let token = Uuid::parse_str(&scrub_token(&body.token))
        .map_err(|_| AccountsServiceError::VerificationTokenNotFound)?;
    let usecase = ConfirmPhoneChangeUseCase {
        accounts: state.account_repo(),
        verification_tokens: state.verification_token_repo(),
        sms: state.sms_gateway(),
    };
    let out = usecase
        .execute(ConfirmPhoneChangeInput {
            token,
            code: body.code,
        })
        .await?;
    Ok(Json(ConfirmPhoneChangeResponse {
        new_phone: out.new_phone,
    }))
}
