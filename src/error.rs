/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / body)
 * - token 認証の拒否は middleware::auth::token の固定レスポンスに委譲する
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::middleware::auth::token;
use crate::services::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing token")]
    MissingToken,
    #[error("authentication failed: {0}")]
    AuthenticationFailed(#[source] AuthError),
    #[error("forbidden")]
    Forbidden,
    #[error("internal server error")]
    Internal,
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::AuthenticationFailed(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::MissingToken => return token::missing_token_response(),
            AppError::AuthenticationFailed(cause) => {
                return token::on_authentication_failure(&cause);
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", "forbidden".into()),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}
