use sea_orm::entity::prelude::*;

/// One-time activation code for an inactive account (one per account).
/// Expires after 10 minutes; locks after 5 failed attempts; resends are
/// throttled to one per minute and five per day.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "activation_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    /// SHA-256 hex of the 6-digit code.
    pub code_hash: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub attempts: i32,
    pub is_locked: bool,
    pub last_sent_at: chrono::DateTime<chrono::Utc>,
    pub send_count: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
