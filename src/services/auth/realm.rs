//! Token realm interface used by the token filter.
use async_trait::async_trait;
use thiserror::Error;

use super::types::{Principal, Token};

/// Why a realm refused a token.
///
/// Not:
/// - Every variant ends in the same client-facing failure body; the distinction is
///   for logging only.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unknown token")]
    InvalidToken,
    #[error("token expired")]
    ExpiredToken,
    #[error("realm backend error: {0}")]
    Backend(String),
}

/// Validates a token and yields the authenticated principal.
///
/// Implementations must be shareable across requests (`Arc<dyn TokenRealm>`).
#[async_trait]
pub trait TokenRealm: Send + Sync {
    // Realm name (for logging).
    fn name(&self) -> &'static str;

    // Returns:
    // - Ok(principal) => token accepted
    // - Err(_)        => token rejected (caller renders the failure response)
    async fn authenticate(&self, token: &Token) -> Result<Principal, AuthError>;

    // Drops expired tokens; returns how many were removed.
    async fn purge_expired(&self) -> Result<usize, AuthError>;
}
