//! Bearer-token helpers for integration tests.
//!
//! Authenticated endpoints expect `Authorization: Bearer <jwt>`. `TestBearer`
//! mints a signed token for an arbitrary identity so no login round-trip is
//! needed in tests.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use aquabill_auth_types::token::JwtClaims;

/// Configurable identity minted into test requests.
pub struct TestBearer {
    pub account_id: Uuid,
    pub role: u8,
    pub secret: String,
}

impl TestBearer {
    pub fn new(account_id: Uuid, role: u8, secret: &str) -> Self {
        Self {
            account_id,
            role,
            secret: secret.to_owned(),
        }
    }

    /// Sign a JWT for this identity, valid for one hour.
    pub fn token(&self) -> String {
        let exp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs()
            + 3600;
        let claims = JwtClaims {
            sub: self.account_id.to_string(),
            role: self.role,
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .unwrap()
    }

    /// Return headers carrying the bearer token.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Bearer {}", self.token())).unwrap(),
        );
        map
    }
}
