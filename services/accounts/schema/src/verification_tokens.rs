use sea_orm::entity::prelude::*;

/// Single-use verification token for password reset/change and phone change.
/// The row id doubles as the public UUID handle embedded in SMS links; the
/// code itself is only stored hashed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "verification_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Operation tag: `password_reset`, `password_change` or `phone_change`.
    pub purpose: String,
    pub account_id: Option<Uuid>,
    /// Target phone — the NEW number for phone changes.
    pub phone: String,
    pub code_hash: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub attempts: i32,
    pub is_locked: bool,
    pub is_used: bool,
    pub last_sent_at: chrono::DateTime<chrono::Utc>,
    pub send_count: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
