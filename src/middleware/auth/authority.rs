//! Coarse-grained authority checks on top of `access::apply`.

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::AuthContext;
use crate::state::AppState;

/// Require `label` (e.g. `ROLE_ADMIN`) on every route of `router`.
///
/// Must sit inside `access::apply`, which provides the `AuthContext`.
pub fn require(router: Router<AppState>, label: &'static str) -> Router<AppState> {
    router.route_layer(middleware::from_fn(
        move |req: Request<Body>, next: Next| async move {
            let granted = req
                .extensions()
                .get::<AuthContext>()
                .map(|ctx| (ctx.id, ctx.has_authority(label)));

            match granted {
                None => Err(AppError::Unauthorized),
                Some((user_id, false)) => {
                    tracing::debug!(user_id, required = label, "missing authority");
                    Err(AppError::Forbidden)
                }
                Some((_, true)) => Ok::<Response, AppError>(next.run(req).await),
            }
        },
    ))
}
