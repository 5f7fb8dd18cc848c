use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use aquabill_core::health::{healthz, readyz};
use aquabill_core::middleware::request_id_layer;

use crate::handlers::{
    activation::{activate, resend_code},
    password::{
        confirm_password_change, confirm_password_reset, forgot_password,
        request_password_change,
    },
    phone_change::{confirm_phone_change, request_phone_change},
    profile::{get_me, update_me},
    register::register,
    token::{create_token, refresh_token, revoke_token},
    whitelist::{add_whitelist_entry, check_whitelist, list_whitelist, remove_whitelist_entry},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Registration + activation
        .route("/accounts", post(register))
        .route("/accounts/activation", post(activate))
        .route("/accounts/activation/resend", post(resend_code))
        // Token
        .route("/auth/token", post(create_token))
        .route("/auth/token", patch(refresh_token))
        .route("/auth/token", delete(revoke_token))
        // Profile
        .route("/accounts/@me", get(get_me))
        .route("/accounts/@me", patch(update_me))
        // Password reset (forgot) + change
        .route("/auth/password/reset", post(forgot_password))
        .route("/auth/password/reset", patch(confirm_password_reset))
        .route("/auth/password/change", post(request_password_change))
        .route("/auth/password/change", patch(confirm_password_change))
        // Phone change
        .route("/accounts/@me/phone", post(request_phone_change))
        .route("/accounts/phone", patch(confirm_phone_change))
        // Whitelist administration
        .route("/whitelist", get(list_whitelist))
        .route("/whitelist", post(add_whitelist_entry))
        .route("/whitelist/check", post(check_whitelist))
        .route("/whitelist", delete(remove_whitelist_entry))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
