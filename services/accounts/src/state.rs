use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use aquabill_auth_types::identity::JwtSecret;

use crate::infra::db::{
    DbAccountRepository, DbActivationTokenRepository, DbVerificationTokenRepository,
    DbWhitelistRepository,
};
use crate::infra::sms::SmsDispatcher;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt_secret: String,
    pub sms: SmsDispatcher,
}

impl AppState {
    pub fn account_repo(&self) -> DbAccountRepository {
        DbAccountRepository {
            db: self.db.clone(),
        }
    }

    pub fn activation_token_repo(&self) -> DbActivationTokenRepository {
        DbActivationTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn verification_token_repo(&self) -> DbVerificationTokenRepository {
        DbVerificationTokenRepository {
            db: self.db.clone(),
        }
    }

    pub fn whitelist_repo(&self) -> DbWhitelistRepository {
        DbWhitelistRepository {
            db: self.db.clone(),
        }
    }

    pub fn sms_gateway(&self) -> SmsDispatcher {
        self.sms.clone()
    }
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        JwtSecret(state.jwt_secret.clone())
    }
}
