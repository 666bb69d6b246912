/*
 * Responsibility
 * - 認証済み主体の response DTO
 */
use serde::Serialize;
use uuid::Uuid;

use crate::services::auth::Principal;

#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub user_id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl From<Principal> for PrincipalResponse {
    fn from(p: Principal) -> Self {
        Self {
            user_id: p.user_id,
            username: p.username,
            roles: p.roles,
            permissions: p.permissions,
        }
    }
}
