use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use aquabill_auth_types::identity::Identity;

use crate::domain::repository::ProfileChanges;
use crate::domain::types::Account;
use crate::error::AccountsServiceError;
use crate::state::AppState;
use crate::usecase::profile::{GetProfileUseCase, UpdateProfileUseCase};

/// Public account representation; the credential hash never leaves the service.
#[derive(Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub apartment_name: Option<String>,
    pub is_active: bool,
    #[serde(serialize_with = "aquabill_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_string(),
            full_name: account.full_name(),
            phone: account.phone,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            address: account.address,
            apartment_name: account.apartment_name,
            is_active: account.is_active,
            created_at: account.created_at,
        }
    }
}

// ── GET /accounts/@me ────────────────────────────────────────────────────────

pub async fn get_me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<AccountResponse>, AccountsServiceError> {
    let usecase = GetProfileUseCase {
        accounts: state.account_repo(),
    };
    let account = usecase.execute(identity.account_id).await?;
    Ok(Json(account.into()))
}

// ── PATCH /accounts/@me ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub apartment_name: Option<String>,
}

pub async fn update_me(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<Json<AccountResponse>, AccountsServiceError> {
    let usecase = UpdateProfileUseCase {
        accounts: state.account_repo(),
    };
    let account = usecase
        .execute(
            identity.account_id,
            ProfileChanges {
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                address: body.address,
                apartment_name: body.apartment_name,
            },
        )
        .await?;
    Ok(Json(account.into()))
}
