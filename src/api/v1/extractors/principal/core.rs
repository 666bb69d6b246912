use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::services::auth::Principal;
use crate::state::AppState;

/// Handler で、 Principal を受け取るための extractor
/// token middleware が Principal を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（ミドルウェア未設定の route）
pub struct CurrentPrincipal(pub Principal);

impl FromRequestParts<AppState> for CurrentPrincipal {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentPrincipal)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
