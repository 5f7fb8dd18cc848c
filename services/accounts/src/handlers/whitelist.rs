use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use aquabill_auth_types::identity::Identity;
use aquabill_domain::role::AccountRole;

use crate::domain::types::WhitelistEntry;
use crate::error::AccountsServiceError;
use crate::state::AppState;
use crate::usecase::whitelist::{
    AddWhitelistEntryInput, AddWhitelistEntryUseCase, CheckWhitelistUseCase,
    ListWhitelistUseCase, RemoveWhitelistEntryUseCase,
};

fn require_staff(identity: &Identity) -> Result<(), AccountsServiceError> {
    if identity.role < AccountRole::Staff.as_u8() {
        return Err(AccountsServiceError::Forbidden);
    }
    Ok(())
}

#[derive(Serialize)]
pub struct WhitelistEntryResponse {
    pub id: String,
    pub phone: String,
    pub is_active: bool,
    pub added_by: Option<String>,
    pub notes: String,
    #[serde(serialize_with = "aquabill_core::serde::to_rfc3339_ms")]
    pub added_at: chrono::DateTime<chrono::Utc>,
}

impl From<WhitelistEntry> for WhitelistEntryResponse {
    fn from(entry: WhitelistEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            phone: entry.phone,
            is_active: entry.is_active,
            added_by: entry.added_by.map(|id| id.to_string()),
            notes: entry.notes,
            added_at: entry.added_at,
        }
    }
}

// ── GET /whitelist ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ListWhitelistResponse {
    pub entries: Vec<WhitelistEntryResponse>,
    pub total_count: usize,
    pub active_count: usize,
}

pub async fn list_whitelist(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<ListWhitelistResponse>, AccountsServiceError> {
    require_staff(&identity)?;
    let usecase = ListWhitelistUseCase {
        whitelist: state.whitelist_repo(),
    };
    let out = usecase.execute().await?;
    Ok(Json(ListWhitelistResponse {
        entries: out.entries.into_iter().map(Into::into).collect(),
        total_count: out.total_count,
        active_count: out.active_count,
    }))
}

// ── POST /whitelist ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddWhitelistRequest {
    pub phone: String,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn add_whitelist_entry(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<AddWhitelistRequest>,
) -> Result<(StatusCode, Json<WhitelistEntryResponse>), AccountsServiceError> {
    require_staff(&identity)?;
    let usecase = AddWhitelistEntryUseCase {
        whitelist: state.whitelist_repo(),
    };
    let entry = usecase
        .execute(AddWhitelistEntryInput {
            phone: body.phone,
            notes: body.notes,
            is_active: body.is_active,
            added_by: identity.account_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

// ── POST /whitelist/check ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CheckWhitelistRequest {
    pub phone: String,
}

#[derive(Serialize)]
pub struct CheckWhitelistResponse {
    pub phone: String,
    pub is_authorized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<WhitelistEntryResponse>,
}

pub async fn check_whitelist(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CheckWhitelistRequest>,
) -> Result<Json<CheckWhitelistResponse>, AccountsServiceError> {
    require_staff(&identity)?;
    let usecase = CheckWhitelistUseCase {
        whitelist: state.whitelist_repo(),
    };
    let out = usecase.execute(&body.phone).await?;
    Ok(Json(CheckWhitelistResponse {
        phone: out.phone,
        is_authorized: out.is_authorized,
        entry: out.entry.map(Into::into),
    }))
}

// ── DELETE /whitelist ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RemoveWhitelistRequest {
    pub phone: String,
}

pub async fn remove_whitelist_entry(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<RemoveWhitelistRequest>,
) -> Result<StatusCode, AccountsServiceError> {
    require_staff(&identity)?;
    let usecase = RemoveWhitelistEntryUseCase {
        whitelist: state.whitelist_repo(),
    };
    usecase.execute(&body.phone).await?;
    Ok(StatusCode::NO_CONTENT)
}
