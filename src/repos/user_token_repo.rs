/*
 * Responsibility
 * - user_token テーブル向け SQLx 操作
 * - token → 発行先ユーザー・権限・有効期限 の参照
 *
 * Table
 *   user_token (
 *     token        text PRIMARY KEY,
 *     user_id      uuid NOT NULL,
 *     user_name    text NOT NULL,
 *     roles        text[] NOT NULL DEFAULT '{}',
 *     permissions  text[] NOT NULL DEFAULT '{}',
 *     expire_time  timestamptz NOT NULL
 *   )
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct UserTokenRow {
    pub user_id: Uuid,
    pub user_name: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub expire_time: DateTime<Utc>,
}

pub async fn find_by_token(db: &PgPool, token: &str) -> Result<Option<UserTokenRow>, RepoError> {
    let row = sqlx::query_as::<_, UserTokenRow>(
        r#"
        SELECT user_id, user_name, roles, permissions, expire_time
        FROM user_token
        WHERE token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn delete_expired(db: &PgPool) -> Result<u64, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM user_token
        WHERE expire_time <= now()
        "#,
    )
    .execute(db)
    .await?;

    Ok(result.rows_affected())
}
