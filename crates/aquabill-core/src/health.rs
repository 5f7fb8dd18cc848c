use axum::http::StatusCode;

/// `GET /healthz`: process is up.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `GET /readyz`: ready to take traffic. Services with external
/// dependencies wire their own check in front of this.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
