/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc で cheap)
 */
use std::sync::Arc;

use crate::services::auth::{AccessTokenVerifier, TokenService, UserLookup};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserLookup>,
    pub tokens: Arc<TokenService>,
    pub verifier: Arc<AccessTokenVerifier>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserLookup>,
        tokens: Arc<TokenService>,
        verifier: Arc<AccessTokenVerifier>,
    ) -> Self {
        Self {
            users,
            tokens,
            verifier,
        }
    }
}
