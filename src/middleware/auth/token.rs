//! `token` ヘッダ / パラメータによる認証 → Principal を extensions に入れる
//!
//! 流れ:
//! - OPTIONS (CORS preflight) は認証せずに通す
//! - `token` ヘッダ → なければ `token` パラメータ (query → form body) から token を取り出す
//! - token が無い: 401 + `invalid token`
//! - realm に検証を委譲し、失敗: 401 + `认证失败` (application/json;charset=utf-8)
//! - 成功: `Principal` を request extensions に格納して次へ

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::services::auth::{AuthError, Token};
use crate::state::AppState;

pub const TOKEN_HEADER: &str = "token";
pub const TOKEN_PARAM: &str = "token";

const MISSING_TOKEN_BODY: &str = "invalid token";
const AUTH_FAILED_BODY: &str = "认证失败";

/// Protects every route of `router` with the token filter.
///
/// 例：
/// ```ignore
/// let protected = middleware::auth::token::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, token_middleware))
}

async fn token_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let req = authenticate_or_reject(&state, req).await?;
    Ok(next.run(req).await)
}

/// CORS preflight requests carry no credentials and are never blocked.
pub fn is_preflight(method: &Method) -> bool {
    method == Method::OPTIONS
}

/// Runs the filter on `req`.
///
/// - `Ok(req)`: the request may proceed (preflight, or the realm accepted the token;
///   in the latter case the `Principal` is in the extensions).
/// - `Err(AppError::MissingToken)` / `Err(AppError::AuthenticationFailed(_))`: terminal.
pub async fn authenticate_or_reject(
    state: &AppState,
    req: Request<Body>,
) -> Result<Request<Body>, AppError> {
    if is_preflight(req.method()) {
        return Ok(req);
    }

    let (mut req, token) = extract_token(req, state.token_body_limit).await;

    let Some(token) = token else {
        tracing::debug!(
            method = %req.method(),
            path = %req.uri().path(),
            "request without token"
        );
        return Err(AppError::MissingToken);
    };

    match state.realm.authenticate(&token).await {
        Ok(principal) => {
            tracing::debug!(
                realm = state.realm.name(),
                user_id = %principal.user_id,
                "token accepted"
            );
            req.extensions_mut().insert(principal);
            Ok(req)
        }
        Err(cause) => {
            tracing::debug!(
                realm = state.realm.name(),
                token = %token.redacted(),
                "token rejected"
            );
            Err(AppError::AuthenticationFailed(cause))
        }
    }
}

/// Header `token` first; otherwise the first `token` request parameter
/// (query string, then an urlencoded form body).
///
/// The request is handed back because reading a form body consumes it;
/// the buffered bytes are put back unchanged. A form body that cannot be
/// read (too large, broken stream) yields no parameter token.
pub async fn extract_token(
    req: Request<Body>,
    body_limit: usize,
) -> (Request<Body>, Option<Token>) {
    if let Some(token) = header_token(req.headers()) {
        return (req, Some(token));
    }

    if let Some(value) = req.uri().query().and_then(|q| first_param(q.as_bytes())) {
        let token = Token::parse(&value);
        return (req, token);
    }

    if !is_form(req.headers()) {
        return (req, None);
    }

    let (parts, body) = req.into_parts();
    match to_bytes(body, body_limit).await {
        Ok(bytes) => {
            let token = first_param(&bytes).and_then(|v| Token::parse(&v));
            (Request::from_parts(parts, Body::from(bytes)), token)
        }
        Err(err) => {
            tracing::debug!(error = %err, "form body could not be read");
            (Request::from_parts(parts, Body::empty()), None)
        }
    }
}

fn header_token(headers: &HeaderMap) -> Option<Token> {
    headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(Token::parse)
}

// First occurrence only, like a servlet `getParameter`.
fn first_param(encoded: &[u8]) -> Option<String> {
    url::form_urlencoded::parse(encoded)
        .find(|(k, _)| k == TOKEN_PARAM)
        .map(|(_, v)| v.into_owned())
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            v.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
        .unwrap_or(false)
}

/// Response for a request that carried no token at all.
pub fn missing_token_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [
            (header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "true"),
            (header::CONTENT_TYPE, "text/plain;charset=utf-8"),
        ],
        MISSING_TOKEN_BODY,
    )
        .into_response()
}

/// Response for a token the realm refused. Same body whatever the cause.
pub fn on_authentication_failure(cause: &AuthError) -> Response {
    match cause {
        AuthError::Backend(_) => tracing::error!(error = %cause, "token realm unavailable"),
        _ => tracing::warn!(error = %cause, "token authentication failed"),
    }

    (
        StatusCode::UNAUTHORIZED,
        [
            (header::CONTENT_TYPE, "application/json;charset=utf-8"),
            (header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "true"),
        ],
        AUTH_FAILED_BODY,
    )
        .into_response()
}
