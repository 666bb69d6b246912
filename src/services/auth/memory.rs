//! In-process token realm.
//!
//! Used when no database is configured (local development, tests).
//! Tokens live only as long as the process.
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::realm::{AuthError, TokenRealm};
use super::token_generator::TokenGenerator;
use super::types::{Principal, Token};

/// `now + ttl`, saturating at the far future.
pub fn expire_time_after(ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[derive(Debug, Clone)]
struct Entry {
    principal: Principal,
    expire_time: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct InMemoryRealm {
    tokens: RwLock<HashMap<String, Entry>>,
}

impl InMemoryRealm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh token for `principal`, valid for `ttl`.
    pub async fn issue(&self, principal: Principal, ttl: Duration) -> String {
        let token = TokenGenerator::generate();
        let expire_time = expire_time_after(ttl);

        self.tokens.write().await.insert(
            token.clone(),
            Entry {
                principal,
                expire_time,
            },
        );
        token
    }

    /// Registers a caller-chosen token. Returns `false` if it is blank.
    pub async fn insert(
        &self,
        token: &str,
        principal: Principal,
        expire_time: DateTime<Utc>,
    ) -> bool {
        let Some(token) = Token::parse(token) else {
            return false;
        };
        self.tokens.write().await.insert(
            token.as_str().to_owned(),
            Entry {
                principal,
                expire_time,
            },
        );
        true
    }
}

#[async_trait]
impl TokenRealm for InMemoryRealm {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn authenticate(&self, token: &Token) -> Result<Principal, AuthError> {
        let tokens = self.tokens.read().await;
        let entry = tokens.get(token.as_str()).ok_or(AuthError::InvalidToken)?;

        if entry.expire_time <= Utc::now() {
            return Err(AuthError::ExpiredToken);
        }

        Ok(entry.principal.clone())
    }

    async fn purge_expired(&self) -> Result<usize, AuthError> {
        let now = Utc::now();
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, e| e.expire_time > now);
        Ok(before - tokens.len())
    }
}
