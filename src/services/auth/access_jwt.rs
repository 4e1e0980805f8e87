use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

/// Errors returned by access-token verification.
#[derive(Debug, Error)]
pub enum AccessJwtError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
    #[error("invalid 'sub' (expected numeric user id)")]
    InvalidSub,
}

/// Access token claims as issued by `TokenService`.
///
/// `iss` / `aud` / `exp` are checked by jsonwebtoken's `Validation` and not kept.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,
    #[serde(default)]
    pub jti: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Verified token in application terms.
#[derive(Debug, Clone)]
pub struct VerifiedAccessToken {
    pub user_id: i64,
    pub jti: Option<String>,
    pub roles: Vec<String>,
}

/// EdDSA (Ed25519) access-token verifier.
#[derive(Clone)]
pub struct AccessTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for AccessTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("AccessTokenVerifier")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl AccessTokenVerifier {
    pub fn new(
        access_public_key_pem: &str,
        issuer: &str,
        audience: &str,
        leeway_seconds: u64,
    ) -> Result<Self, AccessJwtError> {
        let decoding_key = DecodingKey::from_ed_pem(access_public_key_pem.as_bytes())?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Signature, `exp`, `iss` and `aud` are checked by jsonwebtoken;
    /// `sub` must additionally be a non-empty numeric user id.
    pub fn verify(&self, token: &str) -> Result<VerifiedAccessToken, AccessJwtError> {
        let claims =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?
                .claims;

        let sub = claims.sub.trim();
        if sub.is_empty() {
            return Err(AccessJwtError::EmptyClaim("sub"));
        }
        let user_id = sub.parse::<i64>().map_err(|_| AccessJwtError::InvalidSub)?;

        Ok(VerifiedAccessToken {
            user_id,
            jti: claims.jti,
            roles: claims.roles,
        })
    }
}
