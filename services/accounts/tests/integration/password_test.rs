use chrono::Utc;
use uuid::Uuid;

use aquabill_accounts::domain::types::{VerificationPurpose, VerificationToken, hash_code};
use aquabill_accounts::error::AccountsServiceError;
use aquabill_accounts::password::verify_password;
use aquabill_accounts::usecase::password::{
    ConfirmPasswordChangeInput, ConfirmPasswordChangeUseCase, ConfirmPasswordResetInput,
    ConfirmPasswordResetUseCase, RequestPasswordChangeInput, RequestPasswordChangeUseCase,
    RequestPasswordResetInput, RequestPasswordResetUseCase,
};

use crate::helpers::{
    MockAccountRepo, MockSmsGateway, MockVerificationTokenRepo, TEST_PASSWORD, TEST_PHONE,
    test_account,
};

const CODE: &str = "123456";

fn reset_token(account_id: Uuid, purpose: VerificationPurpose) -> VerificationToken {
    let now = Utc::now();
    VerificationToken {
        id: Uuid::new_v4(),
        purpose,
        account_id: Some(account_id),
        phone: TEST_PHONE.to_owned(),
        code_hash: hash_code(CODE),
        expires_at: now + chrono::Duration::minutes(10),
        attempts: 0,
        is_locked: false,
        is_used: false,
        last_sent_at: now,
        send_count: 1,
        created_at: now,
    }
}

// ── Request reset ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_and_send_reset_token_for_known_phone() {
    let account = test_account(TEST_PHONE, true);
    let tokens = MockVerificationTokenRepo::empty();
    let tokens_handle = tokens.tokens_handle();
    let sms = MockSmsGateway::new();
    let sent_handle = sms.sent_handle();

    let uc = RequestPasswordResetUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        verification_tokens: tokens,
        sms,
    };

    let out = uc
        .execute(RequestPasswordResetInput {
            phone: TEST_PHONE.to_owned(),
        })
        .await
        .unwrap();

    let stored = tokens_handle.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(out.token, Some(stored[0].id));
    assert_eq!(stored[0].purpose, VerificationPurpose::PasswordReset);

    let sent = sent_handle.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, "password_reset");
    assert_eq!(
        stored[0].code_hash,
        hash_code(sent[0].code.as_deref().unwrap())
    );
}

#[tokio::test]
async fn should_answer_success_without_token_for_unknown_phone() {
    let tokens = MockVerificationTokenRepo::empty();
    let tokens_handle = tokens.tokens_handle();
    let sms = MockSmsGateway::new();
    let sent_handle = sms.sent_handle();

    let uc = RequestPasswordResetUseCase {
        accounts: MockAccountRepo::empty(),
        verification_tokens: tokens,
        sms,
    };

    let out = uc
        .execute(RequestPasswordResetInput {
            phone: TEST_PHONE.to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(out.token, None, "unknown phone still succeeds");
    assert!(tokens_handle.lock().unwrap().is_empty());
    assert!(sent_handle.lock().unwrap().is_empty(), "no sms leaks");
}

#[tokio::test]
async fn should_supersede_older_reset_tokens() {
    let account = test_account(TEST_PHONE, true);
    let old = reset_token(account.id, VerificationPurpose::PasswordReset);
    let tokens = MockVerificationTokenRepo::new(vec![old.clone()]);
    let tokens_handle = tokens.tokens_handle();

    let uc = RequestPasswordResetUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        verification_tokens: tokens,
        sms: MockSmsGateway::new(),
    };

    uc.execute(RequestPasswordResetInput {
        phone: TEST_PHONE.to_owned(),
    })
    .await
    .unwrap();

    let stored = tokens_handle.lock().unwrap();
    assert_eq!(stored.len(), 1, "old token superseded");
    assert_ne!(stored[0].id, old.id);
}

// ── Confirm reset ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reset_password_and_consume_token() {
    let account = test_account(TEST_PHONE, true);
    let token = reset_token(account.id, VerificationPurpose::PasswordReset);
    let token_id = token.id;

    let accounts = MockAccountRepo::new(vec![account.clone()]);
    let accounts_handle = accounts.accounts_handle();
    let tokens = MockVerificationTokenRepo::new(vec![token]);
    let tokens_handle = tokens.tokens_handle();
    let sms = MockSmsGateway::new();
    let sent_handle = sms.sent_handle();

    let uc = ConfirmPasswordResetUseCase {
        accounts,
        verification_tokens: tokens,
        sms,
    };

    uc.execute(ConfirmPasswordResetInput {
        token: token_id,
        code: CODE.to_owned(),
        new_password: "brand new password".to_owned(),
        new_password_confirm: "brand new password".to_owned(),
    })
    .await
    .unwrap();

    let stored = accounts_handle.lock().unwrap();
    assert!(verify_password("brand new password", &stored[0].password_hash));
    assert!(!verify_password(TEST_PASSWORD, &stored[0].password_hash));

    let tokens = tokens_handle.lock().unwrap();
    assert!(tokens[0].is_used, "token is single use");

    let sent = sent_handle.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, "confirmation");
}

#[tokio::test]
async fn should_not_fail_reset_when_confirmation_sms_fails() {
    let account = test_account(TEST_PHONE, true);
    let token = reset_token(account.id, VerificationPurpose::PasswordReset);
    let token_id = token.id;

    let uc = ConfirmPasswordResetUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        verification_tokens: MockVerificationTokenRepo::new(vec![token]),
        sms: MockSmsGateway::failing(),
    };

    let result = uc
        .execute(ConfirmPasswordResetInput {
            token: token_id,
            code: CODE.to_owned(),
            new_password: "brand new password".to_owned(),
            new_password_confirm: "brand new password".to_owned(),
        })
        .await;
    assert!(result.is_ok(), "confirmation sms is best effort");
}

#[tokio::test]
async fn should_reject_wrong_reset_code_and_count_attempt() {
    let account = test_account(TEST_PHONE, true);
    let token = reset_token(account.id, VerificationPurpose::PasswordReset);
    let token_id = token.id;
    let tokens = MockVerificationTokenRepo::new(vec![token]);
    let tokens_handle = tokens.tokens_handle();

    let uc = ConfirmPasswordResetUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        verification_tokens: tokens,
        sms: MockSmsGateway::new(),
    };

    let result = uc
        .execute(ConfirmPasswordResetInput {
            token: token_id,
            code: "000000".to_owned(),
            new_password: "brand new password".to_owned(),
            new_password_confirm: "brand new password".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(AccountsServiceError::InvalidCode)));
    assert_eq!(tokens_handle.lock().unwrap()[0].attempts, 1);
}

#[tokio::test]
async fn should_reject_used_reset_token() {
    let account = test_account(TEST_PHONE, true);
    let mut token = reset_token(account.id, VerificationPurpose::PasswordReset);
    token.is_used = true;
    let token_id = token.id;

    let uc = ConfirmPasswordResetUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        verification_tokens: MockVerificationTokenRepo::new(vec![token]),
        sms: MockSmsGateway::new(),
    };

    let result = uc
        .execute(ConfirmPasswordResetInput {
            token: token_id,
            code: CODE.to_owned(),
            new_password: "brand new password".to_owned(),
            new_password_confirm: "brand new password".to_owned(),
        })
        .await;
    assert!(matches!(
        result,
        Err(AccountsServiceError::VerificationTokenNotFound)
    ));
}

#[tokio::test]
async fn should_reject_reset_token_of_other_purpose() {
    let account = test_account(TEST_PHONE, true);
    let token = reset_token(account.id, VerificationPurpose::PhoneChange);
    let token_id = token.id;

    let uc = ConfirmPasswordResetUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        verification_tokens: MockVerificationTokenRepo::new(vec![token]),
        sms: MockSmsGateway::new(),
    };

    let result = uc
        .execute(ConfirmPasswordResetInput {
            token: token_id,
            code: CODE.to_owned(),
            new_password: "brand new password".to_owned(),
            new_password_confirm: "brand new password".to_owned(),
        })
        .await;
    assert!(matches!(
        result,
        Err(AccountsServiceError::VerificationTokenNotFound)
    ));
}

// ── Password change ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_request_password_change_with_correct_current_password() {
    let account = test_account(TEST_PHONE, true);
    let tokens = MockVerificationTokenRepo::empty();
    let tokens_handle = tokens.tokens_handle();

    let uc = RequestPasswordChangeUseCase {
        accounts: MockAccountRepo::new(vec![account.clone()]),
        verification_tokens: tokens,
        sms: MockSmsGateway::new(),
    };

    let out = uc
        .execute(RequestPasswordChangeInput {
            account_id: account.id,
            current_password: TEST_PASSWORD.to_owned(),
        })
        .await
        .unwrap();

    let stored = tokens_handle.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, out.token);
    assert_eq!(stored[0].purpose, VerificationPurpose::PasswordChange);
}

#[tokio::test]
async fn should_reject_change_request_with_wrong_current_password() {
    let account = test_account(TEST_PHONE, true);

    let uc = RequestPasswordChangeUseCase {
        accounts: MockAccountRepo::new(vec![account.clone()]),
        verification_tokens: MockVerificationTokenRepo::empty(),
        sms: MockSmsGateway::new(),
    };

    let result = uc
        .execute(RequestPasswordChangeInput {
            account_id: account.id,
            current_password: "wrong password".to_owned(),
        })
        .await;
    assert!(matches!(
        result,
        Err(AccountsServiceError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn should_confirm_password_change() {
    let account = test_account(TEST_PHONE, true);
    let token = reset_token(account.id, VerificationPurpose::PasswordChange);
    let token_id = token.id;

    let accounts = MockAccountRepo::new(vec![account]);
    let accounts_handle = accounts.accounts_handle();

    let uc = ConfirmPasswordChangeUseCase {
        accounts,
        verification_tokens: MockVerificationTokenRepo::new(vec![token]),
        sms: MockSmsGateway::new(),
    };

    uc.execute(ConfirmPasswordChangeInput {
        token: token_id,
        code: CODE.to_owned(),
        new_password: "brand new password".to_owned(),
        new_password_confirm: "brand new password".to_owned(),
    })
    .await
    .unwrap();

    let stored = accounts_handle.lock().unwrap();
    assert!(verify_password("brand new password", &stored[0].password_hash));
}

#[tokio::test]
async fn should_reject_weak_replacement_password() {
    let account = test_account(TEST_PHONE, true);
    let token = reset_token(account.id, VerificationPurpose::PasswordChange);
    let token_id = token.id;

    let uc = ConfirmPasswordChangeUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        verification_tokens: MockVerificationTokenRepo::new(vec![token]),
        sms: MockSmsGateway::new(),
    };

    let result = uc
        .execute(ConfirmPasswordChangeInput {
            token: token_id,
            code: CODE.to_owned(),
            new_password: "short".to_owned(),
            new_password_confirm: "short".to_owned(),
        })
        .await;
    assert!(matches!(result, Err(AccountsServiceError::WeakPassword)));
}
