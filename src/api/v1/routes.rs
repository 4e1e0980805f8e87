/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 公開 listener: /health は認証なし、/me 以下は access middleware、
 *   /admin 以下はさらに ROLE_ADMIN を要求
 * - 内部 listener: /token (token 発行) は公開 router には載せない
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{health::health, me::me, token::issue_token};
use crate::middleware::auth::{access, authority};
use crate::state::AppState;

pub const ADMIN_AUTHORITY: &str = "ROLE_ADMIN";

pub fn routes(state: AppState) -> Router<AppState> {
    let admin = authority::require(
        Router::new().route("/admin/me", get(me)),
        ADMIN_AUTHORITY,
    );

    let protected = access::apply(Router::new().route("/me", get(me)).merge(admin), state);

    Router::new().route("/health", get(health)).merge(protected)
}

/// Token issuance. Callers on this listener have already authenticated the subject.
pub fn internal_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/token", post(issue_token))
}
