/// Factories: build auth services from application `Config`.
use std::sync::Arc;
use tracing::warn;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::jwt::JwtIssuer;
use crate::services::auth::{AccessTokenVerifier, TokenService, UserLookup};

pub fn build_token_service(
    config: &Config,
    users: Arc<dyn UserLookup>,
) -> Result<Arc<TokenService>, AppError> {
    let jwt = JwtIssuer::new(
        &config.access_jwt_private_key_pem,
        config.auth_issuer.clone(),
        config.auth_audience.clone(),
        config.access_token_ttl_seconds,
    )?;

    Ok(Arc::new(TokenService::new(users, jwt)))
}

pub fn build_access_verifier(config: &Config) -> Result<Arc<AccessTokenVerifier>, AppError> {
    let verifier = AccessTokenVerifier::new(
        &config.access_jwt_public_key_pem,
        &config.auth_issuer,
        &config.auth_audience,
        config.access_token_leeway_seconds,
    )
    .map_err(|e| {
        warn!(error = %e, "failed to parse access JWT public key PEM (expected Ed25519 SPKI PEM)");
        AppError::Internal
    })?;

    Ok(Arc::new(verifier))
}
