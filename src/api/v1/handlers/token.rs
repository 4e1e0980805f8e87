use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;

use crate::api::v1::dto::token::{TokenRequest, TokenResponse};
use crate::error::AppError;
use crate::state::AppState;

pub async fn issue_token(
    State(state): State<AppState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let Json(req) = payload?;
    let out = state.tokens.issue_access_token(req.user_id).await?;

    Ok((
        StatusCode::OK,
        Json(TokenResponse {
            access_token: out.access_token,
            token_type: out.token_type.to_string(),
            expires_in: out.expires_in,
            roles: out.roles,
        }),
    ))
}
