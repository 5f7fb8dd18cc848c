use chrono::Utc;
use uuid::Uuid;

use aquabill_domain::phone;

use crate::domain::repository::WhitelistRepository;
use crate::domain::types::WhitelistEntry;
use crate::error::AccountsServiceError;

// ── ListWhitelist ────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ListWhitelistOutput {
    pub entries: Vec<WhitelistEntry>,
    pub total_count: usize,
    pub active_count: usize,
}

pub struct ListWhitelistUseCase<W: WhitelistRepository> {
    pub whitelist: W,
}

impl<W: WhitelistRepository> ListWhitelistUseCase<W> {
    pub async fn execute(&self) -> Result<ListWhitelistOutput, AccountsServiceError> {
        let entries = self.whitelist.list().await?;
        let total_count = entries.len();
        let active_count = entries.iter().filter(|e| e.is_active).count();
        Ok(ListWhitelistOutput {
            entries,
            total_count,
            active_count,
        })
    }
}

// ── AddWhitelistEntry ────────────────────────────────────────────────────────

pub struct AddWhitelistEntryInput {
    pub phone: String,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
    pub added_by: Uuid,
}

pub struct AddWhitelistEntryUseCase<W: WhitelistRepository> {
    pub whitelist: W,
}

impl<W: WhitelistRepository> AddWhitelistEntryUseCase<W> {
    /// Authorize a phone number. Re-adding an existing number returns the
    /// existing entry untouched rather than conflicting.
    pub async fn execute(
        &self,
        input: AddWhitelistEntryInput,
    ) -> Result<WhitelistEntry, AccountsServiceError> {
        let phone =
            phone::canonicalize(&input.phone).ok_or(AccountsServiceError::InvalidPhone)?;

        if let Some(existing) = self.whitelist.find_by_phone(&phone).await? {
            return Ok(existing);
        }

        let entry = WhitelistEntry {
            id: Uuid::now_v7(),
            phone,
            is_active: input.is_active.unwrap_or(true),
            added_by: Some(input.added_by),
            notes: input.notes.unwrap_or_default(),
            added_at: Utc::now(),
        };
        self.whitelist.insert(&entry).await?;

        tracing::info!(phone = %entry.phone, "phone added to whitelist");
        Ok(entry)
    }
}

// ── CheckWhitelist ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct CheckWhitelistOutput {
    pub phone: String,
    pub is_authorized: bool,
    pub entry: Option<WhitelistEntry>,
}

pub struct CheckWhitelistUseCase<W: WhitelistRepository> {
    pub whitelist: W,
}

impl<W: WhitelistRepository> CheckWhitelistUseCase<W> {
    pub async fn execute(
        &self,
        raw_phone: &str,
    ) -> Result<CheckWhitelistOutput, AccountsServiceError> {
        let phone =
            phone::canonicalize(raw_phone).ok_or(AccountsServiceError::InvalidPhone)?;

        let entry = self.whitelist.find_by_phone(&phone).await?;
        let is_authorized = entry.as_ref().is_some_and(|e| e.is_active);
        Ok(CheckWhitelistOutput {
            phone,
            is_authorized,
            entry: entry.filter(|e| e.is_active),
        })
    }
}

// ── RemoveWhitelistEntry ─────────────────────────────────────────────────────

pub struct RemoveWhitelistEntryUseCase<W: WhitelistRepository> {
    pub whitelist: W,
}

impl<W: WhitelistRepository> RemoveWhitelistEntryUseCase<W> {
    pub async fn execute(&self, raw_phone: &str) -> Result<(), AccountsServiceError> {
        let phone =
            phone::canonicalize(raw_phone).ok_or(AccountsServiceError::InvalidPhone)?;

        if !self.whitelist.remove(&phone).await? {
            return Err(AccountsServiceError::WhitelistEntryNotFound);
        }
        tracing::info!(phone = %phone, "phone removed from whitelist");
        Ok(())
    }
}
