//! Token realm backed by the `user_token` table.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::realm::{AuthError, TokenRealm};
use super::types::{Principal, Token};
use crate::repos::{error::RepoError, user_token_repo};

#[derive(Debug, Clone)]
pub struct PgTokenRealm {
    db: PgPool,
}

impl PgTokenRealm {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

impl From<RepoError> for AuthError {
    fn from(e: RepoError) -> Self {
        AuthError::Backend(e.to_string())
    }
}

/// Row → principal, enforcing expiry against `now`.
fn principal_from_row(
    row: user_token_repo::UserTokenRow,
    now: DateTime<Utc>,
) -> Result<Principal, AuthError> {
    if row.expire_time <= now {
        return Err(AuthError::ExpiredToken);
    }

    Ok(Principal::new(row.user_id, row.user_name)
        .with_roles(row.roles)
        .with_permissions(row.permissions))
}

#[async_trait]
impl TokenRealm for PgTokenRealm {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn authenticate(&self, token: &Token) -> Result<Principal, AuthError> {
        let row = user_token_repo::find_by_token(&self.db, token.as_str())
            .await?
            .ok_or(AuthError::InvalidToken)?;

        principal_from_row(row, Utc::now())
    }

    async fn purge_expired(&self) -> Result<usize, AuthError> {
        let removed = user_token_repo::delete_expired(&self.db).await?;
        Ok(usize::try_from(removed).unwrap_or(usize::MAX))
    }
}
