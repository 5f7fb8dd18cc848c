/// Accounts service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AccountsConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing JWT access and refresh tokens.
    pub jwt_secret: String,
    /// Frontend base URL used in SMS redirect links (e.g. "https://app.example.com").
    pub frontend_base_url: String,
    /// TCP port to listen on (default 3110). Env var: `ACCOUNTS_PORT`.
    pub accounts_port: u16,
    /// SMS API base URL (default "https://api.twilio.com"). Env var: `SMS_API_BASE_URL`.
    pub sms_api_base_url: String,
    /// SMS credentials. All three must be set to use the HTTP transport;
    /// otherwise codes are logged instead of sent.
    pub sms_account_sid: Option<String>,
    pub sms_auth_token: Option<String>,
    pub sms_from_number: Option<String>,
}

impl AccountsConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            frontend_base_url: std::env::var("FRONTEND_BASE_URL").expect("FRONTEND_BASE_URL"),
            accounts_port: std::env::var("ACCOUNTS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3110),
            sms_api_base_url: std::env::var("SMS_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.twilio.com".to_owned()),
            sms_account_sid: std::env::var("SMS_ACCOUNT_SID").ok(),
            sms_auth_token: std::env::var("SMS_AUTH_TOKEN").ok(),
            sms_from_number: std::env::var("SMS_FROM_NUMBER").ok(),
        }
    }
}
