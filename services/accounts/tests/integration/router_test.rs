use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use uuid::Uuid;

use aquabill_accounts::infra::sms::{LogSmsGateway, SmsDispatcher};
use aquabill_accounts::router::build_router;
use aquabill_accounts::state::AppState;
use aquabill_testing::auth::TestBearer;

const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Router over a disconnected database. Good for routes that are decided
/// before any query runs (health, auth and role rejections).
fn test_server() -> TestServer {
    let state = AppState {
        db: sea_orm::DatabaseConnection::default(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        sms: SmsDispatcher::Log(LogSmsGateway {
            frontend_base_url: "https://app.example.com".to_owned(),
        }),
    };
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn healthz_answers_ok() {
    let server = test_server();
    let response = server.get("/healthz").await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn readyz_answers_ok() {
    let server = test_server();
    let response = server.get("/readyz").await;
    response.assert_status(StatusCode::OK);
}

#[tokio::test]
async fn profile_requires_bearer_token() {
    let server = test_server();
    let response = server.get("/accounts/@me").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

fn bearer_header(token: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("authorization"),
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    )
}

#[tokio::test]
async fn profile_rejects_garbage_bearer_token() {
    let server = test_server();
    let (name, value) = bearer_header("not-a-jwt");
    let response = server.get("/accounts/@me").add_header(name, value).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn whitelist_rejects_customer_role() {
    let server = test_server();
    let bearer = TestBearer::new(Uuid::now_v7(), 0, TEST_JWT_SECRET);
    let (name, value) = bearer_header(&bearer.token());

    let response = server.get("/whitelist").add_header(name, value).await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn logout_acknowledges_valid_bearer() {
    let server = test_server();
    let bearer = TestBearer::new(Uuid::now_v7(), 0, TEST_JWT_SECRET);
    let (name, value) = bearer_header(&bearer.token());

    let response = server.delete("/auth/token").add_header(name, value).await;
    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn logout_requires_bearer() {
    let server = test_server();
    let response = server.delete("/auth/token").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}
