use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use tracing::{error, warn};

use crate::error::AppError;

/// EdDSA (Ed25519) JWT signer for access tokens.
///
/// `ttl_seconds` is held as `i64` so `exp = iat + ttl` is plain timestamp math.
#[derive(Clone)]
pub struct JwtIssuer {
    issuer: String,
    audience: String,
    ttl_seconds: i64,
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIssuer")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl JwtIssuer {
    /// `private_key_pem` must be an Ed25519 private key in PKCS#8 PEM format.
    /// `ttl_seconds` must fit in a JWT NumericDate (`i64`).
    pub fn new(
        private_key_pem: &str,
        issuer: String,
        audience: String,
        ttl_seconds: u64,
    ) -> Result<Self, AppError> {
        let ttl_seconds = i64::try_from(ttl_seconds).map_err(|_| {
            warn!(ttl_seconds, "access token ttl does not fit in a JWT timestamp");
            AppError::Internal
        })?;

        let encoding_key = EncodingKey::from_ed_pem(private_key_pem.as_bytes()).map_err(|e| {
            warn!(error = %e, "failed to parse access JWT private key PEM (expected Ed25519 PKCS#8 PEM)");
            AppError::Internal
        })?;

        Ok(Self {
            issuer,
            audience,
            ttl_seconds,
            encoding_key,
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Lifetime reported to clients as `expires_in`.
    pub fn expires_in(&self) -> u64 {
        self.ttl_seconds.unsigned_abs()
    }

    /// `exp` for a token issued at `issued_at`; `None` past the end of time.
    pub fn expires_at(&self, issued_at: i64) -> Option<i64> {
        issued_at.checked_add(self.ttl_seconds)
    }

    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, AppError> {
        let mut header = Header::new(Algorithm::EdDSA);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            AppError::Internal
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::token_service::testing::{AUDIENCE, ISSUER, PRIVATE_KEY_PEM};

    fn issuer(ttl_seconds: u64) -> Result<JwtIssuer, AppError> {
        JwtIssuer::new(PRIVATE_KEY_PEM, ISSUER.into(), AUDIENCE.into(), ttl_seconds)
    }

    #[test]
    fn header_is_eddsa_jwt() {
        let token = issuer(600)
            .unwrap()
            .sign(&serde_json::json!({ "sub": "7" }))
            .unwrap();

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::EdDSA);
        assert_eq!(header.typ.as_deref(), Some("JWT"));
    }

    #[test]
    fn ttl_beyond_i64_is_rejected() {
        assert!(matches!(issuer(u64::MAX), Err(AppError::Internal)));
        assert!(matches!(
            issuer(i64::MAX as u64 + 1),
            Err(AppError::Internal)
        ));
    }

    #[test]
    fn expiry_past_i64_is_none_instead_of_wrapping() {
        let jwt = issuer(i64::MAX as u64).unwrap();

        assert_eq!(jwt.expires_at(0), Some(i64::MAX));
        assert_eq!(jwt.expires_at(1_700_000_000), None);
        assert_eq!(jwt.expires_in(), i64::MAX as u64);
    }

    #[test]
    fn expiry_is_issued_at_plus_ttl() {
        let jwt = issuer(600).unwrap();

        assert_eq!(jwt.expires_at(1_700_000_000), Some(1_700_000_600));
        assert_eq!(jwt.expires_in(), 600);
    }

    #[test]
    fn non_ed25519_key_is_rejected() {
        let err = JwtIssuer::new("not a pem", ISSUER.into(), AUDIENCE.into(), 600).unwrap_err();
        assert!(matches!(err, AppError::Internal));
    }
}
