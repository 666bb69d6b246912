//! CORS policy for browser clients.
//!
//! Browsers send the `token` header cross-origin, so credentials are allowed.
//! Credentials forbid wildcards, hence:
//! - Development: the request origin is mirrored back.
//! - Production: allowlist origins from Config (comma-separated env var).
//!
//! Preflight `OPTIONS` requests are answered here; the token filter never sees them
//! as authentication attempts either way.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;
use crate::middleware::auth::token::TOKEN_HEADER;

pub fn layer(config: &Config) -> CorsLayer {
    let allow_origin = if config.app_env.is_production() {
        // An empty allowlist allows nothing.
        let allowed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        AllowOrigin::predicate(move |origin: &HeaderValue, _req| {
            allowed.iter().any(|v| v == origin)
        })
    } else {
        AllowOrigin::mirror_request()
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static(TOKEN_HEADER),
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(std::time::Duration::from_secs(60 * 10))
}

/// Apply CORS policy to the given Router.
pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(config))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;
    use crate::config::AppEnv;

    fn app(config: &Config) -> Router {
        apply(Router::new().route("/ping", get(|| async { "pong" })), config)
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/ping")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "token")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn development_mirrors_origin_with_credentials() {
        let res = app(&Config::default())
            .oneshot(preflight("http://localhost:5173"))
            .await
            .expect("response");

        assert_eq!(res.status(), StatusCode::OK);
        let headers = res.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn production_allows_only_listed_origins() {
        let config = Config {
            app_env: AppEnv::Production,
            cors_allowed_origins: vec!["https://app.example".into()],
            ..Config::default()
        };

        let res = app(&config)
            .oneshot(preflight("https://app.example"))
            .await
            .expect("response");
        assert_eq!(
            res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://app.example"
        );

        let res = app(&config)
            .oneshot(preflight("https://evil.example"))
            .await
            .expect("response");
        assert!(
            res.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }
}
