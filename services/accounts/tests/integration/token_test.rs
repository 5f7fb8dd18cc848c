use aquabill_accounts::error::AccountsServiceError;
use aquabill_accounts::usecase::token::{LoginInput, LoginUseCase, RefreshTokenUseCase};
use aquabill_auth_types::token::validate_access_token;

use crate::helpers::{MockAccountRepo, TEST_PASSWORD, TEST_PHONE, test_account};

const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

#[tokio::test]
async fn should_login_active_account() {
    let account = test_account(TEST_PHONE, true);
    let accounts = MockAccountRepo::new(vec![account.clone()]);
    let accounts_handle = accounts.accounts_handle();

    let uc = LoginUseCase {
        accounts,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let out = uc
        .execute(LoginInput {
            phone: TEST_PHONE.to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await
        .unwrap();

    let info = validate_access_token(&out.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.account_id, account.id);
    assert_eq!(info.access_token_exp, out.access_token_exp);

    assert!(out.account.last_login.is_some());
    let stored = accounts_handle.lock().unwrap();
    assert!(stored[0].last_login.is_some(), "login timestamp persisted");
}

#[tokio::test]
async fn should_accept_unnormalized_phone_spelling_at_login() {
    let account = test_account(TEST_PHONE, true);

    let uc = LoginUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc
        .execute(LoginInput {
            phone: "237 658 552 294".to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let uc = LoginUseCase {
        accounts: MockAccountRepo::new(vec![test_account(TEST_PHONE, true)]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc
        .execute(LoginInput {
            phone: TEST_PHONE.to_owned(),
            password: "wrong password".to_owned(),
        })
        .await;
    assert!(matches!(
        result,
        Err(AccountsServiceError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn should_reject_unknown_phone_with_same_error_as_wrong_password() {
    let uc = LoginUseCase {
        accounts: MockAccountRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc
        .execute(LoginInput {
            phone: TEST_PHONE.to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await;
    assert!(
        matches!(result, Err(AccountsServiceError::InvalidCredentials)),
        "unknown phone must not be distinguishable from a wrong password"
    );
}

#[tokio::test]
async fn should_reject_inactive_account_login() {
    let uc = LoginUseCase {
        accounts: MockAccountRepo::new(vec![test_account(TEST_PHONE, false)]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc
        .execute(LoginInput {
            phone: TEST_PHONE.to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await;
    assert!(matches!(
        result,
        Err(AccountsServiceError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn should_refresh_with_valid_refresh_token() {
    let account = test_account(TEST_PHONE, true);

    let login = LoginUseCase {
        accounts: MockAccountRepo::new(vec![account.clone()]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let out = login
        .execute(LoginInput {
            phone: TEST_PHONE.to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await
        .unwrap();

    let refresh = RefreshTokenUseCase {
        accounts: MockAccountRepo::new(vec![account.clone()]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let refreshed = refresh.execute(&out.refresh_token).await.unwrap();

    assert_eq!(refreshed.account_id, account.id);
    let info = validate_access_token(&refreshed.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.account_id, account.id);
}

#[tokio::test]
async fn should_reject_garbage_refresh_token() {
    let uc = RefreshTokenUseCase {
        accounts: MockAccountRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };

    let result = uc.execute("not-a-jwt").await;
    assert!(matches!(
        result,
        Err(AccountsServiceError::InvalidRefreshToken)
    ));
}

#[tokio::test]
async fn should_reject_refresh_for_deleted_account() {
    let account = test_account(TEST_PHONE, true);

    let login = LoginUseCase {
        accounts: MockAccountRepo::new(vec![account]),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let out = login
        .execute(LoginInput {
            phone: TEST_PHONE.to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await
        .unwrap();

    // Account gone by the time the refresh arrives.
    let refresh = RefreshTokenUseCase {
        accounts: MockAccountRepo::empty(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    };
    let result = refresh.execute(&out.refresh_token).await;
    assert!(matches!(
        result,
        Err(AccountsServiceError::InvalidRefreshToken)
    ));
}
