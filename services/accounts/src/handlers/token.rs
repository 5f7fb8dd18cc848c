use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use aquabill_auth_types::identity::Identity;

use crate::error::AccountsServiceError;
use crate::handlers::profile::AccountResponse;
use crate::state::AppState;
use crate::usecase::token::{LoginInput, LoginUseCase, RefreshTokenUseCase};

#[derive(Serialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token expiry, seconds since UNIX epoch.
    pub access_token_exp: u64,
}

// ── POST /auth/token (login) ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateTokenRequest {
    pub phone: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub account: AccountResponse,
    #[serde(flatten)]
    pub tokens: TokenPairResponse,
}

pub async fn create_token(
    State(state): State<AppState>,
    Json(body): Json<CreateTokenRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), AccountsServiceError> {
    let usecase = LoginUseCase {
        accounts: state.account_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(LoginInput {
            phone: body.phone,
            password: body.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            account: out.account.into(),
            tokens: TokenPairResponse {
                access_token: out.access_token,
                refresh_token: out.refresh_token,
                access_token_exp: out.access_token_exp,
            },
        }),
    ))
}

// ── PATCH /auth/token (refresh) ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<(StatusCode, Json<TokenPairResponse>), AccountsServiceError> {
    let usecase = RefreshTokenUseCase {
        accounts: state.account_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase.execute(&body.refresh_token).await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenPairResponse {
            access_token: out.access_token,
            refresh_token: out.refresh_token,
            access_token_exp: out.access_token_exp,
        }),
    ))
}

// ── DELETE /auth/token (logout) ──────────────────────────────────────────────

/// Tokens are stateless, so logout is an acknowledgement; the client discards
/// its pair.
pub async fn revoke_token(_identity: Identity) -> StatusCode {
    StatusCode::NO_CONTENT
}
