//! SMS gateways.
//!
//! The activation and verification flows only ever talk to the
//! [`SmsGateway`] port; which transport backs it is a deployment decision.
//! Without Twilio-style credentials the logging gateway is used and codes
//! land in the service log instead of a phone.

use uuid::Uuid;

use crate::domain::repository::SmsGateway;
use crate::domain::types::VerificationPurpose;
use crate::error::AccountsServiceError;

/// Invisible code points that SMS clients are known to append when a link or
/// token is copied out of a message (zero-width spaces/joiners, word joiner,
/// BOM).
const INVISIBLE_CHARS: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

/// Strip whitespace and invisible Unicode from a token string.
///
/// Applied to incoming token handles before UUID parsing, so a token pasted
/// from an SMS with trailing invisible characters still resolves.
pub fn scrub_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !INVISIBLE_CHARS.contains(c))
        .collect()
}

/// Frontend page that consumes a verification token of the given purpose.
fn redirect_path(purpose: VerificationPurpose) -> &'static str {
    match purpose {
        VerificationPurpose::PasswordReset => "/reset-password",
        VerificationPurpose::PasswordChange => "/change-password",
        VerificationPurpose::PhoneChange => "/change-phone",
    }
}

/// Build the confirmation link embedded in verification SMS messages.
pub fn redirect_url(frontend_base_url: &str, purpose: VerificationPurpose, token: Uuid) -> String {
    format!(
        "{}{}?token={}",
        frontend_base_url.trim_end_matches('/'),
        redirect_path(purpose),
        token
    )
}

fn activation_body(code: &str) -> String {
    format!(
        "Your Aquabill activation code is: {code}. \
         This code expires in 10 minutes. Do not share this code."
    )
}

fn verification_body(code: &str, purpose: VerificationPurpose, link: &str) -> String {
    let action = match purpose {
        VerificationPurpose::PasswordReset => "reset your password",
        VerificationPurpose::PasswordChange => "change your password",
        VerificationPurpose::PhoneChange => "confirm your new number",
    };
    format!(
        "Your Aquabill code to {action} is: {code}. \
         It expires in 10 minutes. Continue at {link}"
    )
}

fn confirmation_body(purpose: VerificationPurpose, detail: Option<&str>) -> String {
    let base = match purpose {
        VerificationPurpose::PasswordReset => "Your Aquabill password has been reset.",
        VerificationPurpose::PasswordChange => "Your Aquabill password has been changed.",
        VerificationPurpose::PhoneChange => "Your Aquabill phone number has been changed.",
    };
    match detail {
        Some(detail) => format!("{base} {detail}"),
        None => base.to_owned(),
    }
}

// ── Logging gateway (development / tests) ────────────────────────────────────

/// Logs messages instead of sending them.
#[derive(Clone)]
pub struct LogSmsGateway {
    pub frontend_base_url: String,
}

impl SmsGateway for LogSmsGateway {
    async fn is_available(&self) -> bool {
        true
    }

    async fn send_activation_code(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<(), AccountsServiceError> {
        tracing::info!(phone = %phone, body = %activation_body(code), "sms (log only)");
        Ok(())
    }

    async fn send_verification_code(
        &self,
        phone: &str,
        code: &str,
        purpose: VerificationPurpose,
        token: Uuid,
    ) -> Result<(), AccountsServiceError> {
        let link = redirect_url(&self.frontend_base_url, purpose, token);
        tracing::info!(
            phone = %phone,
            body = %verification_body(code, purpose, &link),
            "sms (log only)"
        );
        Ok(())
    }

    async fn send_confirmation(
        &self,
        phone: &str,
        purpose: VerificationPurpose,
        detail: Option<&str>,
    ) -> Result<(), AccountsServiceError> {
        tracing::info!(
            phone = %phone,
            body = %confirmation_body(purpose, detail),
            "sms (log only)"
        );
        Ok(())
    }
}

// ── HTTP gateway (Twilio-style REST API) ─────────────────────────────────────

/// Sends through a Twilio-compatible Messages endpoint with basic auth.
#[derive(Clone)]
pub struct HttpSmsGateway {
    pub http: reqwest::Client,
    pub api_base_url: String,
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub frontend_base_url: String,
}

impl HttpSmsGateway {
    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base_url.trim_end_matches('/'),
            self.account_sid
        )
    }

    async fn dispatch(&self, to: &str, body: &str) -> Result<(), AccountsServiceError> {
        let params = [("To", to), ("From", self.from_number.as_str()), ("Body", body)];
        let response = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, phone = %to, "sms dispatch request failed");
                AccountsServiceError::SmsFailed
            })?;

        if !response.status().is_success() {
            tracing::error!(status = %response.status(), phone = %to, "sms dispatch rejected");
            return Err(AccountsServiceError::SmsFailed);
        }
        Ok(())
    }
}

impl SmsGateway for HttpSmsGateway {
    async fn is_available(&self) -> bool {
        let url = format!(
            "{}/2010-04-01/Accounts/{}.json",
            self.api_base_url.trim_end_matches('/'),
            self.account_sid
        );
        match self
            .http
            .get(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn send_activation_code(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<(), AccountsServiceError> {
        self.dispatch(phone, &activation_body(code)).await
    }

    async fn send_verification_code(
        &self,
        phone: &str,
        code: &str,
        purpose: VerificationPurpose,
        token: Uuid,
    ) -> Result<(), AccountsServiceError> {
        let link = redirect_url(&self.frontend_base_url, purpose, token);
        self.dispatch(phone, &verification_body(code, purpose, &link))
            .await
    }

    async fn send_confirmation(
        &self,
        phone: &str,
        purpose: VerificationPurpose,
        detail: Option<&str>,
    ) -> Result<(), AccountsServiceError> {
        self.dispatch(phone, &confirmation_body(purpose, detail)).await
    }
}

// ── Dispatcher (transport selected at startup) ───────────────────────────────

/// Concrete gateway handed to usecases; delegates to whichever transport the
/// configuration selected.
#[derive(Clone)]
pub enum SmsDispatcher {
    Log(LogSmsGateway),
    Http(HttpSmsGateway),
}

impl SmsGateway for SmsDispatcher {
    async fn is_available(&self) -> bool {
        match self {
            Self::Log(gw) => gw.is_available().await,
            Self::Http(gw) => gw.is_available().await,
        }
    }

    async fn send_activation_code(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<(), AccountsServiceError> {
        match self {
            Self::Log(gw) => gw.send_activation_code(phone, code).await,
            Self::Http(gw) => gw.send_activation_code(phone, code).await,
        }
    }

    async fn send_verification_code(
        &self,
        phone: &str,
        code: &str,
        purpose: VerificationPurpose,
        token: Uuid,
    ) -> Result<(), AccountsServiceError> {
        match self {
            Self::Log(gw) => gw.send_verification_code(phone, code, purpose, token).await,
            Self::Http(gw) => gw.send_verification_code(phone, code, purpose, token).await,
        }
    }

    async fn send_confirmation(
        &self,
        phone: &str,
        purpose: VerificationPurpose,
        detail: Option<&str>,
    ) -> Result<(), AccountsServiceError> {
        match self {
            Self::Log(gw) => gw.send_confirmation(phone, purpose, detail).await,
            Self::Http(gw) => gw.send_confirmation(phone, purpose, detail).await,
        }
    }
}
