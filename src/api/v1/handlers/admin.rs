/*
 * Responsibility
 * - GET /admin/ping: `admin` ロールを要求する route
 * - 認証は middleware、認可 (role) は handler 側で判定する
 */
use axum::Json;
use serde_json::{Value, json};

use crate::{api::v1::extractors::CurrentPrincipal, error::AppError};

pub const ADMIN_ROLE: &str = "admin";

pub async fn ping(CurrentPrincipal(principal): CurrentPrincipal) -> Result<Json<Value>, AppError> {
    if !principal.has_role(ADMIN_ROLE) {
        tracing::info!(user_id = %principal.user_id, "admin route denied");
        return Err(AppError::Forbidden);
    }

    Ok(Json(json!({"pong": principal.username})))
}
