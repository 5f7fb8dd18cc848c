use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::AccountsServiceError;
use crate::state::AppState;
use crate::usecase::register::{RegisterInput, RegisterUseCase};

// ── POST /accounts ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirm: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub apartment_name: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    /// Canonical phone the activation code was sent to.
    pub phone: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AccountsServiceError> {
    let usecase = RegisterUseCase {
        accounts: state.account_repo(),
        whitelist: state.whitelist_repo(),
        sms: state.sms_gateway(),
    };
    let account = usecase
        .execute(RegisterInput {
            phone: body.phone,
            first_name: body.first_name,
            last_name: body.last_name,
            password: body.password,
            password_confirm: body.password_confirm,
            email: body.email,
            address: body.address,
            apartment_name: body.apartment_name,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            phone: account.phone,
        }),
    ))
}
