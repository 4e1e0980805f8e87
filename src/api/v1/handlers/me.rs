/*
 * Responsibility
 * - GET /me, GET /admin/me
 * - AuthContext は middleware が用意済み (ここでは DB に触らない)
 */
use axum::Json;

use crate::api::v1::dto::me::MeResponse;
use crate::api::v1::extractors::AuthCtxExtractor;

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    Json(MeResponse::from(ctx))
}
