use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::services::auth::context::AuthContextBuilder;
use crate::services::auth::jwt::JwtIssuer;
use crate::services::auth::user_lookup::UserLookup;

#[derive(Debug, Serialize)]
struct AccessTokenClaims {
    iss: String,
    aud: String,
    sub: String,
    iat: i64,
    exp: i64,
    jti: String,
    roles: Vec<String>,
    center_id: i64,
}

/// Service-level return type to keep handlers thin.
#[derive(Clone, Debug)]
pub struct IssuedAccessToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub roles: Vec<String>,
}

/// Issues access tokens whose `roles` claim carries the user's role labels.
#[derive(Clone)]
pub struct TokenService {
    users: Arc<dyn UserLookup>,
    jwt: JwtIssuer,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt", &self.jwt)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(users: Arc<dyn UserLookup>, jwt: JwtIssuer) -> Self {
        Self { users, jwt }
    }

    /// Issue an access token for an existing user.
    ///
    /// The caller is trusted to have authenticated the subject already;
    /// this only reshapes the stored user into claims.
    pub async fn issue_access_token(&self, user_id: i64) -> Result<IssuedAccessToken, AppError> {
        let Some(user) = self.users.find_user(user_id).await? else {
            debug!(user_id, "token requested for unknown user");
            return Err(AppError::not_found("user"));
        };

        let ctx = AuthContextBuilder::build_auth_context(&user);
        if !ctx.is_usable() {
            warn!(user_id, "token requested for disabled account");
            return Err(AppError::Forbidden);
        }

        let roles = AuthContextBuilder::derive_role_labels(&user);

        let now = chrono::Utc::now().timestamp();
        let Some(exp) = self.jwt.expires_at(now) else {
            warn!(user_id, "access token expiry overflows");
            return Err(AppError::Internal);
        };
        let claims = AccessTokenClaims {
            iss: self.jwt.issuer().to_string(),
            aud: self.jwt.audience().to_string(),
            sub: ctx.id.to_string(),
            iat: now,
            exp,
            jti: Uuid::new_v4().to_string(),
            roles: roles.clone(),
            center_id: ctx.center_id,
        };

        let access_token = self.jwt.sign(&claims)?;
        debug!(user_id, roles = ?roles, "issued access token");

        Ok(IssuedAccessToken {
            access_token,
            token_type: "Bearer",
            expires_in: self.jwt.expires_in(),
            roles,
        })
    }
}
