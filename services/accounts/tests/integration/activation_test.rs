use chrono::{Duration, Utc};

use aquabill_accounts::domain::types::{
    ActivationToken, MAX_CODE_ATTEMPTS, MAX_SENDS_PER_DAY, RESEND_COOLDOWN_SECS, hash_code,
};
use aquabill_accounts::error::AccountsServiceError;
use aquabill_accounts::usecase::activation::{
    ActivateInput, ActivateUseCase, ResendActivationInput, ResendActivationUseCase,
};

use crate::helpers::{
    MockAccountRepo, MockActivationTokenRepo, MockSmsGateway, TEST_PHONE, test_account,
};

const CODE: &str = "123456";

/// Pending token with a known code, sent `sent_ago` seconds in the past.
fn pending_token(account_id: uuid::Uuid, sent_ago: i64) -> ActivationToken {
    let now = Utc::now();
    ActivationToken {
        id: uuid::Uuid::new_v4(),
        account_id,
        code_hash: hash_code(CODE),
        expires_at: now + Duration::minutes(10),
        attempts: 0,
        is_locked: false,
        last_sent_at: now - Duration::seconds(sent_ago),
        send_count: 1,
        created_at: now - Duration::seconds(sent_ago),
    }
}

// ── Activate ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_activate_account_with_valid_code() {
    let account = test_account(TEST_PHONE, false);
    let token = pending_token(account.id, 0);
    let token_id = token.id;

    let accounts = MockAccountRepo::new(vec![account.clone()]);
    let activated_handle = accounts.activated_handle();

    let uc = ActivateUseCase {
        accounts,
        activation_tokens: MockActivationTokenRepo::new(vec![token]),
    };

    let activated = uc
        .execute(ActivateInput {
            phone: TEST_PHONE.to_owned(),
            code: CODE.to_owned(),
        })
        .await
        .unwrap();

    assert!(activated.is_active);
    let calls = activated_handle.lock().unwrap();
    assert_eq!(*calls, vec![(account.id, token_id)]);
}

#[tokio::test]
async fn should_count_failed_attempt_on_wrong_code() {
    let account = test_account(TEST_PHONE, false);
    let tokens = MockActivationTokenRepo::new(vec![pending_token(account.id, 0)]);
    let tokens_handle = tokens.tokens_handle();

    let uc = ActivateUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        activation_tokens: tokens,
    };

    let result = uc
        .execute(ActivateInput {
            phone: TEST_PHONE.to_owned(),
            code: "000000".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(AccountsServiceError::InvalidCode)));
    let tokens = tokens_handle.lock().unwrap();
    assert_eq!(tokens[0].attempts, 1);
    assert!(!tokens[0].is_locked);
}

#[tokio::test]
async fn should_lock_token_on_final_failed_attempt() {
    let account = test_account(TEST_PHONE, false);
    let mut token = pending_token(account.id, 0);
    token.attempts = MAX_CODE_ATTEMPTS - 1;
    let tokens = MockActivationTokenRepo::new(vec![token]);
    let tokens_handle = tokens.tokens_handle();

    let uc = ActivateUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        activation_tokens: tokens,
    };

    let result = uc
        .execute(ActivateInput {
            phone: TEST_PHONE.to_owned(),
            code: "000000".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(AccountsServiceError::InvalidCode)));
    let tokens = tokens_handle.lock().unwrap();
    assert_eq!(tokens[0].attempts, MAX_CODE_ATTEMPTS);
    assert!(tokens[0].is_locked, "fifth failure locks the token");
}

#[tokio::test]
async fn should_reject_right_code_on_locked_token() {
    let account = test_account(TEST_PHONE, false);
    let mut token = pending_token(account.id, 0);
    token.is_locked = true;

    let uc = ActivateUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        activation_tokens: MockActivationTokenRepo::new(vec![token]),
    };

    let result = uc
        .execute(ActivateInput {
            phone: TEST_PHONE.to_owned(),
            code: CODE.to_owned(),
        })
        .await;
    assert!(matches!(result, Err(AccountsServiceError::TokenLocked)));
}

#[tokio::test]
async fn should_reject_expired_code() {
    let account = test_account(TEST_PHONE, false);
    let mut token = pending_token(account.id, 0);
    token.expires_at = Utc::now() - Duration::minutes(1);

    let uc = ActivateUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        activation_tokens: MockActivationTokenRepo::new(vec![token]),
    };

    let result = uc
        .execute(ActivateInput {
            phone: TEST_PHONE.to_owned(),
            code: CODE.to_owned(),
        })
        .await;
    assert!(matches!(result, Err(AccountsServiceError::CodeExpired)));
}

#[tokio::test]
async fn should_reject_activation_of_active_account() {
    let account = test_account(TEST_PHONE, true);

    let uc = ActivateUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        activation_tokens: MockActivationTokenRepo::empty(),
    };

    let result = uc
        .execute(ActivateInput {
            phone: TEST_PHONE.to_owned(),
            code: CODE.to_owned(),
        })
        .await;
    assert!(matches!(result, Err(AccountsServiceError::AlreadyActive)));
}

#[tokio::test]
async fn should_reject_activation_without_pending_token() {
    let account = test_account(TEST_PHONE, false);

    let uc = ActivateUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        activation_tokens: MockActivationTokenRepo::empty(),
    };

    let result = uc
        .execute(ActivateInput {
            phone: TEST_PHONE.to_owned(),
            code: CODE.to_owned(),
        })
        .await;
    assert!(matches!(
        result,
        Err(AccountsServiceError::NoPendingActivation)
    ));
}

#[tokio::test]
async fn should_reject_activation_of_unknown_phone() {
    let uc = ActivateUseCase {
        accounts: MockAccountRepo::empty(),
        activation_tokens: MockActivationTokenRepo::empty(),
    };

    let result = uc
        .execute(ActivateInput {
            phone: TEST_PHONE.to_owned(),
            code: CODE.to_owned(),
        })
        .await;
    assert!(matches!(result, Err(AccountsServiceError::AccountNotFound)));
}

// ── Resend ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_block_resend_within_cooldown() {
    let account = test_account(TEST_PHONE, false);
    let token = pending_token(account.id, RESEND_COOLDOWN_SECS - 10);

    let uc = ResendActivationUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        activation_tokens: MockActivationTokenRepo::new(vec![token]),
        sms: MockSmsGateway::new(),
    };

    let result = uc
        .execute(ResendActivationInput {
            phone: TEST_PHONE.to_owned(),
        })
        .await;
    assert!(matches!(result, Err(AccountsServiceError::ResendCooldown)));
}

#[tokio::test]
async fn should_resend_with_fresh_code_after_cooldown() {
    let account = test_account(TEST_PHONE, false);
    let token = pending_token(account.id, RESEND_COOLDOWN_SECS + 10);
    let old_hash = token.code_hash.clone();

    let tokens = MockActivationTokenRepo::new(vec![token]);
    let tokens_handle = tokens.tokens_handle();
    let sms = MockSmsGateway::new();
    let sent_handle = sms.sent_handle();

    let uc = ResendActivationUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        activation_tokens: tokens,
        sms,
    };

    uc.execute(ResendActivationInput {
        phone: TEST_PHONE.to_owned(),
    })
    .await
    .unwrap();

    let sent = sent_handle.lock().unwrap();
    assert_eq!(sent.len(), 1);

    let tokens = tokens_handle.lock().unwrap();
    assert_eq!(tokens[0].send_count, 2);
    assert_eq!(tokens[0].attempts, 0, "resend resets the attempt counter");
    assert_ne!(tokens[0].code_hash, old_hash, "a new code was generated");
    assert_eq!(
        tokens[0].code_hash,
        hash_code(sent[0].code.as_deref().unwrap())
    );
}

#[tokio::test]
async fn should_block_resend_at_daily_quota() {
    let account = test_account(TEST_PHONE, false);
    let mut token = pending_token(account.id, RESEND_COOLDOWN_SECS + 10);
    token.send_count = MAX_SENDS_PER_DAY;

    let uc = ResendActivationUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        activation_tokens: MockActivationTokenRepo::new(vec![token]),
        sms: MockSmsGateway::new(),
    };

    let result = uc
        .execute(ResendActivationInput {
            phone: TEST_PHONE.to_owned(),
        })
        .await;
    assert!(matches!(
        result,
        Err(AccountsServiceError::ResendQuotaExceeded)
    ));
}

#[tokio::test]
async fn should_reset_quota_on_new_day() {
    let account = test_account(TEST_PHONE, false);
    let mut token = pending_token(account.id, 60 * 60 * 25);
    token.send_count = MAX_SENDS_PER_DAY;

    let tokens = MockActivationTokenRepo::new(vec![token]);
    let tokens_handle = tokens.tokens_handle();

    let uc = ResendActivationUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        activation_tokens: tokens,
        sms: MockSmsGateway::new(),
    };

    uc.execute(ResendActivationInput {
        phone: TEST_PHONE.to_owned(),
    })
    .await
    .unwrap();

    let tokens = tokens_handle.lock().unwrap();
    assert_eq!(tokens[0].send_count, 1, "counter restarts on a new day");
}

#[tokio::test]
async fn should_block_resend_on_locked_token() {
    let account = test_account(TEST_PHONE, false);
    let mut token = pending_token(account.id, RESEND_COOLDOWN_SECS + 10);
    token.is_locked = true;

    let uc = ResendActivationUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        activation_tokens: MockActivationTokenRepo::new(vec![token]),
        sms: MockSmsGateway::new(),
    };

    let result = uc
        .execute(ResendActivationInput {
            phone: TEST_PHONE.to_owned(),
        })
        .await;
    assert!(matches!(result, Err(AccountsServiceError::TokenLocked)));
}

#[tokio::test]
async fn should_not_advance_counters_when_resend_sms_fails() {
    let account = test_account(TEST_PHONE, false);
    let token = pending_token(account.id, RESEND_COOLDOWN_SECS + 10);
    let old_hash = token.code_hash.clone();

    let tokens = MockActivationTokenRepo::new(vec![token]);
    let tokens_handle = tokens.tokens_handle();

    let uc = ResendActivationUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        activation_tokens: tokens,
        sms: MockSmsGateway::failing(),
    };

    let result = uc
        .execute(ResendActivationInput {
            phone: TEST_PHONE.to_owned(),
        })
        .await;

    assert!(matches!(result, Err(AccountsServiceError::SmsFailed)));
    let tokens = tokens_handle.lock().unwrap();
    assert_eq!(tokens[0].send_count, 1, "failed send does not eat the quota");
    assert_eq!(tokens[0].code_hash, old_hash);
}

#[tokio::test]
async fn should_issue_fresh_token_when_none_pending() {
    let account = test_account(TEST_PHONE, false);

    let tokens = MockActivationTokenRepo::empty();
    let tokens_handle = tokens.tokens_handle();
    let sms = MockSmsGateway::new();
    let sent_handle = sms.sent_handle();

    let uc = ResendActivationUseCase {
        accounts: MockAccountRepo::new(vec![account.clone()]),
        activation_tokens: tokens,
        sms,
    };

    uc.execute(ResendActivationInput {
        phone: TEST_PHONE.to_owned(),
    })
    .await
    .unwrap();

    let tokens = tokens_handle.lock().unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].account_id, account.id);
    assert_eq!(sent_handle.lock().unwrap().len(), 1);
}
