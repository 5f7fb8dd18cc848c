use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// One-time code length in digits.
pub const CODE_LEN: usize = 6;

/// Code time-to-live in minutes.
pub const CODE_TTL_MINUTES: i64 = 10;

/// Failed verification attempts before a token locks.
pub const MAX_CODE_ATTEMPTS: i32 = 5;

/// Resend cooldown in seconds.
pub const RESEND_COOLDOWN_SECS: i64 = 60;

/// Maximum code sends per calendar day.
pub const MAX_SENDS_PER_DAY: i32 = 5;

/// Generate a 6-digit one-time code.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(100_000..1_000_000u32).to_string()
}

/// SHA-256 hex digest of a code. Only this ever reaches the store.
pub fn hash_code(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}

/// Account holder. `phone` is always in canonical `+digits` form.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub apartment_name: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
    pub role: u8,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }
}

/// Outcome of checking a candidate code against a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    Valid,
    Expired,
    Locked,
    Mismatch,
}

/// Outcome of asking to resend a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResendDecision {
    /// Sending is allowed. `quota_reset` means the daily counter starts over
    /// because the last send was on a previous day.
    Allowed { quota_reset: bool },
    Cooldown,
    QuotaExceeded,
}

fn check_code(
    candidate: &str,
    code_hash: &str,
    expired: bool,
    locked: bool,
    attempts: i32,
) -> CodeCheck {
    if expired {
        return CodeCheck::Expired;
    }
    if locked || attempts >= MAX_CODE_ATTEMPTS {
        return CodeCheck::Locked;
    }
    if hash_code(candidate) == code_hash {
        CodeCheck::Valid
    } else {
        CodeCheck::Mismatch
    }
}

fn resend_decision(
    last_sent_at: DateTime<Utc>,
    send_count: i32,
    now: DateTime<Utc>,
) -> ResendDecision {
    if now - last_sent_at < Duration::seconds(RESEND_COOLDOWN_SECS) {
        return ResendDecision::Cooldown;
    }
    if send_count >= MAX_SENDS_PER_DAY {
        // The quota is per calendar day, not a rolling window.
        if now.date_naive() > last_sent_at.date_naive() {
            return ResendDecision::Allowed { quota_reset: true };
        }
        return ResendDecision::QuotaExceeded;
    }
    ResendDecision::Allowed { quota_reset: false }
}

/// One-time activation code for an inactive account (one per account).
#[derive(Debug, Clone)]
pub struct ActivationToken {
    pub id: Uuid,
    pub account_id: Uuid,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: i32,
    pub is_locked: bool,
    pub last_sent_at: DateTime<Utc>,
    pub send_count: i32,
    pub created_at: DateTime<Utc>,
}

impl ActivationToken {
    /// Build a fresh token for `account_id`. Returns the token and the
    /// plaintext code, which the caller sends and then drops.
    pub fn issue(account_id: Uuid, now: DateTime<Utc>) -> (Self, String) {
        let code = generate_code();
        let token = Self {
            id: Uuid::new_v4(),
            account_id,
            code_hash: hash_code(&code),
            expires_at: now + Duration::minutes(CODE_TTL_MINUTES),
            attempts: 0,
            is_locked: false,
            last_sent_at: now,
            send_count: 1,
            created_at: now,
        };
        (token, code)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Check a candidate code. Pure; the caller persists the attempt bump on
    /// [`CodeCheck::Mismatch`].
    pub fn verify(&self, candidate: &str, now: DateTime<Utc>) -> CodeCheck {
        check_code(
            candidate,
            &self.code_hash,
            self.is_expired(now),
            self.is_locked,
            self.attempts,
        )
    }

    pub fn resend_decision(&self, now: DateTime<Utc>) -> ResendDecision {
        resend_decision(self.last_sent_at, self.send_count, now)
    }
}

/// Operation gated by a verification token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationPurpose {
    PasswordReset,
    PasswordChange,
    PhoneChange,
}

impl VerificationPurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PasswordReset => "password_reset",
            Self::PasswordChange => "password_change",
            Self::PhoneChange => "phone_change",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "password_reset" => Some(Self::PasswordReset),
            "password_change" => Some(Self::PasswordChange),
            "phone_change" => Some(Self::PhoneChange),
            _ => None,
        }
    }
}

/// Single-use verification token for password reset/change and phone change.
/// `id` doubles as the public UUID handle embedded in SMS links.
#[derive(Debug, Clone)]
pub struct VerificationToken {
    pub id: Uuid,
    pub purpose: VerificationPurpose,
    pub account_id: Option<Uuid>,
    /// Target phone. For phone changes this is the NEW number.
    pub phone: String,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: i32,
    pub is_locked: bool,
    pub is_used: bool,
    pub last_sent_at: DateTime<Utc>,
    pub send_count: i32,
    pub created_at: DateTime<Utc>,
}

impl VerificationToken {
    /// Build a fresh token. Returns the token and the plaintext code.
    pub fn issue(
        purpose: VerificationPurpose,
        account_id: Option<Uuid>,
        phone: &str,
        now: DateTime<Utc>,
    ) -> (Self, String) {
        let code = generate_code();
        let token = Self {
            id: Uuid::new_v4(),
            purpose,
            account_id,
            phone: phone.to_owned(),
            code_hash: hash_code(&code),
            expires_at: now + Duration::minutes(CODE_TTL_MINUTES),
            attempts: 0,
            is_locked: false,
            is_used: false,
            last_sent_at: now,
            send_count: 1,
            created_at: now,
        };
        (token, code)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Check a candidate code. Used tokens never verify.
    pub fn verify(&self, candidate: &str, now: DateTime<Utc>) -> CodeCheck {
        check_code(
            candidate,
            &self.code_hash,
            self.is_expired(now),
            self.is_locked || self.is_used,
            self.attempts,
        )
    }
}

/// Phone number authorized to register an account.
#[derive(Debug, Clone)]
pub struct WhitelistEntry {
    pub id: Uuid,
    pub phone: String,
    pub is_active: bool,
    pub added_by: Option<Uuid>,
    pub notes: String,
    pub added_at: DateTime<Utc>,
}
