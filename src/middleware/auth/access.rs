//! access token 検証 → ユーザー再読込 → AuthContext を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` を AccessTokenVerifier で検証
//! - `sub` のユーザーを UserLookup で取り直し、AuthContext を組み立てる
//!   (token 発行後に role が変わっていれば、こちらが正)
//! - status flag が一つでも false なら拒否

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::AuthContextBuilder;
use crate::state::AppState;

/// Require a valid access token on every route of `router`.
///
/// Uses `route_layer` so unmatched paths still fall through to 404.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req).ok_or(AppError::Unauthorized)?;

    let verified = match state.verifier.verify(token) {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(AppError::Unauthorized);
        }
    };

    let user = state.users.find_user(verified.user_id).await?;
    let ctx = match AuthContextBuilder::build_from_lookup(user.as_ref()) {
        Ok(ctx) => ctx,
        Err(err) => {
            tracing::warn!(
                user_id = verified.user_id,
                jti = ?verified.jti,
                error = %err,
                "token subject no longer exists"
            );
            return Err(AppError::Unauthorized);
        }
    };

    if !ctx.is_usable() {
        tracing::warn!(user_id = ctx.id, "account is not usable");
        return Err(AppError::Unauthorized);
    }

    if verified.roles != ctx.authority_labels() {
        tracing::debug!(
            user_id = ctx.id,
            token_roles = ?verified.roles,
            current_roles = ?ctx.authority_labels(),
            "roles changed since token issuance"
        );
    }

    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
