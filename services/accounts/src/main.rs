use sea_orm::Database;
use tracing::info;

use aquabill_accounts::config::AccountsConfig;
use aquabill_accounts::infra::sms::{HttpSmsGateway, LogSmsGateway, SmsDispatcher};
use aquabill_accounts::router::build_router;
use aquabill_accounts::state::AppState;
use aquabill_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AccountsConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let sms = match (
        config.sms_account_sid,
        config.sms_auth_token,
        config.sms_from_number,
    ) {
        (Some(account_sid), Some(auth_token), Some(from_number)) => {
            SmsDispatcher::Http(HttpSmsGateway {
                http: reqwest::Client::new(),
                api_base_url: config.sms_api_base_url,
                account_sid,
                auth_token,
                from_number,
                frontend_base_url: config.frontend_base_url,
            })
        }
        _ => {
            info!("sms credentials not configured, codes will be logged");
            SmsDispatcher::Log(LogSmsGateway {
                frontend_base_url: config.frontend_base_url,
            })
        }
    };

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret,
        sms,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.accounts_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("accounts service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
