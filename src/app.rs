/*
 * Responsibility
 * - tracing 初期化 → Config 読み込み → realm 生成 → Router 組み立て
 * - Middleware の適用 (token / CORS / HTTP)
 * - axum::serve() で起動
 */
use anyhow::Result;
use axum::Router;
use tracing_subscriber::EnvFilter;

use crate::{
    api,
    config::Config,
    middleware,
    services::auth::{build_realm, spawn_purge_task},
    state::AppState,
};

const DEFAULT_LOG_FILTER: &str = "token_gate=info,tower_http=info";

pub async fn run() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    let realm = build_realm(&config).await?;
    let _purge = spawn_purge_task(realm.clone(), config.token_purge_interval);

    let state = AppState::new(realm, config.request_body_limit);
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, env = ?config.app_env, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let app = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let app = middleware::cors::apply(app, config);
    middleware::http::apply(app, config)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::services::auth::InMemoryRealm;

    fn app() -> Router {
        let config = Config::default();
        let state = AppState::new(Arc::new(InMemoryRealm::new()), config.request_body_limit);
        build_router(state, &config)
    }

    #[tokio::test]
    async fn missing_token_through_full_stack() {
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/me")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("response");

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            res.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
        assert!(res.headers().get("x-request-id").is_some());

        let body = res.into_body().collect().await.expect("body").to_bytes();
        assert_eq!(&body[..], b"invalid token");
    }

    #[tokio::test]
    async fn cors_preflight_needs_no_token() {
        let res = app()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/v1/me")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("response");

        assert_eq!(res.status(), StatusCode::OK);
    }
}
