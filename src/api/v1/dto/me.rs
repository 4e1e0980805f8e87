/*
 * Responsibility
 * - 認証済みユーザーの応答 DTO
 * - password hash / salt は含めない
 */
use serde::Serialize;

use crate::services::auth::AuthContext;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role_id: Option<String>,
    pub center_id: i64,
    pub tenant_id: Option<i64>,
    pub group_id: Option<i64>,
    pub part_id: Option<i64>,
    pub authorities: Vec<String>,
}

impl From<AuthContext> for MeResponse {
    fn from(ctx: AuthContext) -> Self {
        let authorities = ctx.authority_labels();
        Self {
            id: ctx.id,
            name: ctx.name,
            email: ctx.email,
            role_id: ctx.role_id,
            center_id: ctx.center_id,
            tenant_id: ctx.tenant_id,
            group_id: ctx.group_id,
            part_id: ctx.part_id,
            authorities,
        }
    }
}
