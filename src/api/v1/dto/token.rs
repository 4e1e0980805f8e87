use serde::{Deserialize, Serialize};

/// Request body for `POST /token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    /// Subject (user id). Must already be authenticated upstream.
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Seconds until expiry.
    pub expires_in: u64,
    /// Role labels embedded in the token.
    pub roles: Vec<String>,
}
