/*
 * Responsibility
 * - GET /me: token に紐づく主体をそのまま返す
 */
use axum::Json;

use crate::api::v1::{dto::principal::PrincipalResponse, extractors::CurrentPrincipal};

pub async fn me(CurrentPrincipal(principal): CurrentPrincipal) -> Json<PrincipalResponse> {
    Json(principal.into())
}
