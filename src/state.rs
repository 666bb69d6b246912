/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - realm: token 検証の委譲先
 *   - token_body_limit: form body から token を読む際の上限
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::TokenRealm;

#[derive(Clone)]
pub struct AppState {
    pub realm: Arc<dyn TokenRealm>,
    pub token_body_limit: usize,
}

impl AppState {
    pub fn new(realm: Arc<dyn TokenRealm>, token_body_limit: usize) -> Self {
        Self {
            realm,
            token_body_limit,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("realm", &self.realm.name())
            .field("token_body_limit", &self.token_body_limit)
            .finish()
    }
}
