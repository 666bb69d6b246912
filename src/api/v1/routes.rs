/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は公開、それ以外は token middleware の内側に置く
 */
use axum::{Router, routing::get};

use crate::middleware;
use crate::state::AppState;

use crate::api::v1::handlers::{admin, health::health, me::me};

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .route("/admin/ping", get(admin::ping));
    let protected = middleware::auth::token::apply(protected, state);

    Router::new().route("/health", get(health)).merge(protected)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, Utc};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::services::auth::{InMemoryRealm, Principal};

    async fn app() -> Router {
        let realm = InMemoryRealm::new();
        let expire = Utc::now() + Duration::hours(1);
        realm
            .insert(
                "admin-token",
                Principal::new(Uuid::nil(), "root")
                    .with_roles(["admin"])
                    .with_permissions(["sys:user:list"]),
                expire,
            )
            .await;
        realm
            .insert("user-token", Principal::new(Uuid::new_v4(), "guest"), expire)
            .await;

        let state = AppState::new(Arc::new(realm), 1024);
        Router::new().nest("/api/v1", routes(state.clone())).with_state(state)
    }

    async fn call(uri: &str, token: Option<&str>) -> (StatusCode, String) {
        let mut req = Request::builder().uri(uri);
        if let Some(token) = token {
            req = req.header("token", token);
        }
        let res = app()
            .await
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .expect("response");
        let status = res.status();
        let bytes = res.into_body().collect().await.expect("body").to_bytes();
        (status, String::from_utf8(bytes.to_vec()).expect("utf-8"))
    }

    #[tokio::test]
    async fn health_is_public() {
        let (status, body) = call("/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn me_requires_token() {
        let (status, body) = call("/api/v1/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "invalid token");
    }

    #[tokio::test]
    async fn me_returns_principal() {
        let (status, body) = call("/api/v1/me", Some("admin-token")).await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).expect("json");
        assert_eq!(json["username"], "root");
        assert_eq!(json["user_id"], Uuid::nil().to_string());
        assert_eq!(json["roles"][0], "admin");
        assert_eq!(json["permissions"][0], "sys:user:list");
    }

    #[tokio::test]
    async fn admin_ping_checks_role() {
        let (status, _) = call("/api/v1/admin/ping", Some("user-token")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = call("/api/v1/admin/ping", Some("admin-token")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"pong":"root"}"#);
    }

    #[tokio::test]
    async fn unknown_token_fails_authentication() {
        let (status, body) = call("/api/v1/me", Some("stale")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, "认证失败");
    }
}
