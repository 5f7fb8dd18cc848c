use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use aquabill_accounts_schema::{
    accounts, activation_tokens, phone_whitelist, verification_tokens,
};

use crate::domain::repository::{
    AccountRepository, ActivationTokenRepository, ProfileChanges, VerificationTokenRepository,
    WhitelistRepository,
};
use crate::domain::types::{
    Account, ActivationToken, VerificationPurpose, VerificationToken, WhitelistEntry,
};
use crate::error::AccountsServiceError;

// ── Account repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountRepository {
    pub db: DatabaseConnection,
}

impl AccountRepository for DbAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AccountsServiceError> {
        let model = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find account by id")?;
        Ok(model.map(account_from_model))
    }

    async fn find_by_phone(
        &self,
        phone: &str,
    ) -> Result<Option<Account>, AccountsServiceError> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::Phone.eq(phone))
            .one(&self.db)
            .await
            .context("find account by phone")?;
        Ok(model.map(account_from_model))
    }

    async fn phone_exists(&self, phone: &str) -> Result<bool, AccountsServiceError> {
        let count = accounts::Entity::find()
            .filter(accounts::Column::Phone.eq(phone))
            .count(&self.db)
            .await
            .context("count accounts by phone")?;
        Ok(count > 0)
    }

    async fn create_with_activation(
        &self,
        account: &Account,
        token: &ActivationToken,
    ) -> Result<(), AccountsServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let account = account.clone();
                let token = token.clone();
                Box::pin(async move {
                    insert_account(txn, &account).await?;
                    insert_activation_token(txn, &token).await?;
                    Ok(())
                })
            })
            .await
            .context("create account with activation token")?;
        Ok(())
    }

    async fn activate(
        &self,
        account_id: Uuid,
        token_id: Uuid,
    ) -> Result<(), AccountsServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    accounts::ActiveModel {
                        id: Set(account_id),
                        is_active: Set(true),
                        updated_at: Set(Utc::now()),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    activation_tokens::Entity::delete_by_id(token_id)
                        .exec(txn)
                        .await?;
                    Ok(())
                })
            })
            .await
            .context("activate account")?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<(), AccountsServiceError> {
        let mut am = accounts::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(ref first_name) = changes.first_name {
            am.first_name = Set(first_name.trim().to_owned());
        }
        if let Some(ref last_name) = changes.last_name {
            am.last_name = Set(last_name.trim().to_owned());
        }
        if let Some(ref email) = changes.email {
            am.email = Set(Some(email.clone()));
        }
        if let Some(ref address) = changes.address {
            am.address = Set(Some(address.clone()));
        }
        if let Some(ref apartment) = changes.apartment_name {
            am.apartment_name = Set(Some(apartment.clone()));
        }
        am.updated_at = Set(Utc::now());
        am.update(&self.db).await.context("update profile")?;
        Ok(())
    }

    async fn set_password_hash(
        &self,
        id: Uuid,
        hash: &str,
    ) -> Result<(), AccountsServiceError> {
        accounts::ActiveModel {
            id: Set(id),
            password_hash: Set(hash.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set password hash")?;
        Ok(())
    }

    async fn set_phone(&self, id: Uuid, phone: &str) -> Result<(), AccountsServiceError> {
        accounts::ActiveModel {
            id: Set(id),
            phone: Set(phone.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set phone")?;
        Ok(())
    }

    async fn record_login(
        &self,
        id: Uuid,
        at: chrono::DateTime<Utc>,
    ) -> Result<(), AccountsServiceError> {
        accounts::ActiveModel {
            id: Set(id),
            last_login: Set(Some(at)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("record login")?;
        Ok(())
    }
}

async fn insert_account(
    txn: &DatabaseTransaction,
    account: &Account,
) -> Result<(), sea_orm::DbErr> {
    accounts::ActiveModel {
        id: Set(account.id),
        phone: Set(account.phone.clone()),
        first_name: Set(account.first_name.clone()),
        last_name: Set(account.last_name.clone()),
        email: Set(account.email.clone()),
        address: Set(account.address.clone()),
        apartment_name: Set(account.apartment_name.clone()),
        password_hash: Set(account.password_hash.clone()),
        is_active: Set(account.is_active),
        role: Set(account.role as i16),
        last_login: Set(account.last_login),
        created_at: Set(account.created_at),
        updated_at: Set(account.updated_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_activation_token(
    txn: &DatabaseTransaction,
    token: &ActivationToken,
) -> Result<(), sea_orm::DbErr> {
    activation_tokens::ActiveModel {
        id: Set(token.id),
        account_id: Set(token.account_id),
        code_hash: Set(token.code_hash.clone()),
        expires_at: Set(token.expires_at),
        attempts: Set(token.attempts),
        is_locked: Set(token.is_locked),
        last_sent_at: Set(token.last_sent_at),
        send_count: Set(token.send_count),
        created_at: Set(token.created_at),
        updated_at: Set(token.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn account_from_model(model: accounts::Model) -> Account {
    Account {
        id: model.id,
        phone: model.phone,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        address: model.address,
        apartment_name: model.apartment_name,
        password_hash: model.password_hash,
        is_active: model.is_active,
        role: model.role as u8,
        last_login: model.last_login,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Activation token repository ──────────────────────────────────────────────

#[derive(Clone)]
pub struct DbActivationTokenRepository {
    pub db: DatabaseConnection,
}

impl ActivationTokenRepository for DbActivationTokenRepository {
    async fn find_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Option<ActivationToken>, AccountsServiceError> {
        let model = activation_tokens::Entity::find()
            .filter(activation_tokens::Column::AccountId.eq(account_id))
            .one(&self.db)
            .await
            .context("find activation token by account")?;
        Ok(model.map(activation_token_from_model))
    }

    async fn record_failed_attempt(
        &self,
        id: Uuid,
        attempts: i32,
        lock: bool,
    ) -> Result<(), AccountsServiceError> {
        activation_tokens::ActiveModel {
            id: Set(id),
            attempts: Set(attempts),
            is_locked: Set(lock),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("record failed activation attempt")?;
        Ok(())
    }

    async fn update_for_resend(
        &self,
        token: &ActivationToken,
    ) -> Result<(), AccountsServiceError> {
        activation_tokens::ActiveModel {
            id: Set(token.id),
            code_hash: Set(token.code_hash.clone()),
            expires_at: Set(token.expires_at),
            attempts: Set(token.attempts),
            last_sent_at: Set(token.last_sent_at),
            send_count: Set(token.send_count),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update activation token for resend")?;
        Ok(())
    }

    async fn replace(&self, token: &ActivationToken) -> Result<(), AccountsServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let token = token.clone();
                Box::pin(async move {
                    activation_tokens::Entity::delete_many()
                        .filter(activation_tokens::Column::AccountId.eq(token.account_id))
                        .exec(txn)
                        .await?;
                    insert_activation_token(txn, &token).await?;
                    Ok(())
                })
            })
            .await
            .context("replace activation token")?;
        Ok(())
    }
}

fn activation_token_from_model(model: activation_tokens::Model) -> ActivationToken {
    ActivationToken {
        id: model.id,
        account_id: model.account_id,
        code_hash: model.code_hash,
        expires_at: model.expires_at,
        attempts: model.attempts,
        is_locked: model.is_locked,
        last_sent_at: model.last_sent_at,
        send_count: model.send_count,
        created_at: model.created_at,
    }
}

// ── Verification token repository ────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVerificationTokenRepository {
    pub db: DatabaseConnection,
}

impl VerificationTokenRepository for DbVerificationTokenRepository {
    async fn create_superseding(
        &self,
        token: &VerificationToken,
    ) -> Result<(), AccountsServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let token = token.clone();
                Box::pin(async move {
                    // Supersede prior unused tokens of the same purpose.
                    let delete = verification_tokens::Entity::delete_many()
                        .filter(
                            verification_tokens::Column::Purpose.eq(token.purpose.as_str()),
                        )
                        .filter(verification_tokens::Column::IsUsed.eq(false));
                    let delete = match token.account_id {
                        Some(account_id) => delete
                            .filter(verification_tokens::Column::AccountId.eq(account_id)),
                        None => delete
                            .filter(verification_tokens::Column::Phone.eq(token.phone.clone())),
                    };
                    delete.exec(txn).await?;

                    verification_tokens::ActiveModel {
                        id: Set(token.id),
                        purpose: Set(token.purpose.as_str().to_owned()),
                        account_id: Set(token.account_id),
                        phone: Set(token.phone.clone()),
                        code_hash: Set(token.code_hash.clone()),
                        expires_at: Set(token.expires_at),
                        attempts: Set(token.attempts),
                        is_locked: Set(token.is_locked),
                        is_used: Set(token.is_used),
                        last_sent_at: Set(token.last_sent_at),
                        send_count: Set(token.send_count),
                        created_at: Set(token.created_at),
                        updated_at: Set(token.created_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("create superseding verification token")?;
        Ok(())
    }

    async fn find_usable(
        &self,
        id: Uuid,
        purpose: VerificationPurpose,
    ) -> Result<Option<VerificationToken>, AccountsServiceError> {
        let model = verification_tokens::Entity::find_by_id(id)
            .filter(verification_tokens::Column::Purpose.eq(purpose.as_str()))
            .filter(verification_tokens::Column::IsUsed.eq(false))
            .one(&self.db)
            .await
            .context("find usable verification token")?;
        model.map(verification_token_from_model).transpose()
    }

    async fn record_failed_attempt(
        &self,
        id: Uuid,
        attempts: i32,
        lock: bool,
    ) -> Result<(), AccountsServiceError> {
        verification_tokens::ActiveModel {
            id: Set(id),
            attempts: Set(attempts),
            is_locked: Set(lock),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("record failed verification attempt")?;
        Ok(())
    }

    async fn mark_used(&self, id: Uuid) -> Result<(), AccountsServiceError> {
        verification_tokens::ActiveModel {
            id: Set(id),
            is_used: Set(true),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("mark verification token used")?;
        Ok(())
    }
}

fn verification_token_from_model(
    model: verification_tokens::Model,
) -> Result<VerificationToken, AccountsServiceError> {
    let purpose = VerificationPurpose::from_str(&model.purpose).ok_or_else(|| {
        AccountsServiceError::Internal(anyhow::anyhow!(
            "unknown verification purpose in store: {}",
            model.purpose
        ))
    })?;
    Ok(VerificationToken {
        id: model.id,
        purpose,
        account_id: model.account_id,
        phone: model.phone,
        code_hash: model.code_hash,
        expires_at: model.expires_at,
        attempts: model.attempts,
        is_locked: model.is_locked,
        is_used: model.is_used,
        last_sent_at: model.last_sent_at,
        send_count: model.send_count,
        created_at: model.created_at,
    })
}

// ── Whitelist repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbWhitelistRepository {
    pub db: DatabaseConnection,
}

impl WhitelistRepository for DbWhitelistRepository {
    async fn is_authorized(&self, phone: &str) -> Result<bool, AccountsServiceError> {
        let count = phone_whitelist::Entity::find()
            .filter(phone_whitelist::Column::Phone.eq(phone))
            .filter(phone_whitelist::Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .context("check whitelist authorization")?;
        Ok(count > 0)
    }

    async fn list(&self) -> Result<Vec<WhitelistEntry>, AccountsServiceError> {
        let models = phone_whitelist::Entity::find()
            .order_by_desc(phone_whitelist::Column::AddedAt)
            .all(&self.db)
            .await
            .context("list whitelist")?;
        Ok(models.into_iter().map(whitelist_entry_from_model).collect())
    }

    async fn find_by_phone(
        &self,
        phone: &str,
    ) -> Result<Option<WhitelistEntry>, AccountsServiceError> {
        let model = phone_whitelist::Entity::find()
            .filter(phone_whitelist::Column::Phone.eq(phone))
            .one(&self.db)
            .await
            .context("find whitelist entry by phone")?;
        Ok(model.map(whitelist_entry_from_model))
    }

    async fn insert(&self, entry: &WhitelistEntry) -> Result<(), AccountsServiceError> {
        phone_whitelist::ActiveModel {
            id: Set(entry.id),
            phone: Set(entry.phone.clone()),
            is_active: Set(entry.is_active),
            added_by: Set(entry.added_by),
            notes: Set(entry.notes.clone()),
            added_at: Set(entry.added_at),
        }
        .insert(&self.db)
        .await
        .context("insert whitelist entry")?;
        Ok(())
    }

    async fn remove(&self, phone: &str) -> Result<bool, AccountsServiceError> {
        let result = phone_whitelist::Entity::delete_many()
            .filter(phone_whitelist::Column::Phone.eq(phone))
            .exec(&self.db)
            .await
            .context("remove whitelist entry")?;
        Ok(result.rows_affected > 0)
    }
}

fn whitelist_entry_from_model(model: phone_whitelist::Model) -> WhitelistEntry {
    WhitelistEntry {
        id: model.id,
        phone: model.phone,
        is_active: model.is_active,
        added_by: model.added_by,
        notes: model.notes,
        added_at: model.added_at,
    }
}
