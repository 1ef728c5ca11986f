/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → State 生成 → Router 組み立て
 * - Middleware の適用 (HTTP/CORS/Security headers。API key は v1 routes 側)
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{api, config::Config, middleware, state::AppState};

fn init_tracing() {
    // RUST_LOG=info,api_key_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development では即落として気付けるようにする
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = AppState::new(config.app_env);
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes())
        .with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use axum::routing::{get as get_route, post};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::AppEnv;
    use crate::services::auth::fingerprint;

    fn test_config(app_env: AppEnv, cors_allowed_origins: &[&str]) -> Config {
        Config {
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            app_env,
            cors_allowed_origins: cors_allowed_origins.iter().map(|s| s.to_string()).collect(),
            request_timeout: Duration::from_secs(5),
            request_body_limit_bytes: 1024,
        }
    }

    fn router_for(config: &Config) -> Router {
        build_router(AppState::new(config.app_env), config)
    }

    fn test_router() -> Router {
        router_for(&test_config(AppEnv::Development, &[]))
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/v1/whoami")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
            .body(Body::empty())
            .unwrap()
    }

    fn get(uri: &str, authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(res: axum::response::Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_does_not_need_a_key() {
        let res = test_router()
            .oneshot(get("/api/v1/health", None))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("x-request-id"));
        assert_eq!(res.headers()[header::CACHE_CONTROL], "no-store");
        let body = json_body(res).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["env"], "development");
    }

    #[tokio::test]
    async fn whoami_returns_fingerprint_of_extracted_key() {
        let res = test_router()
            .oneshot(get("/api/v1/whoami", Some("ApiKey test-key-123")))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["scheme"], "ApiKey");
        assert_eq!(body["key_fingerprint"], fingerprint("test-key-123"));
        assert!(!body.to_string().contains("test-key-123"));
    }

    #[tokio::test]
    async fn whoami_without_header_is_401() {
        let res = test_router()
            .oneshot(get("/api/v1/whoami", None))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "ApiKey");
        let body = json_body(res).await;
        assert_eq!(body["error"]["code"], "NO_AUTH_HEADER");
    }

    #[tokio::test]
    async fn whoami_with_empty_header_is_401_no_header() {
        let res = test_router()
            .oneshot(get("/api/v1/whoami", Some("")))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(res).await;
        assert_eq!(body["error"]["code"], "NO_AUTH_HEADER");
    }

    #[tokio::test]
    async fn whoami_with_malformed_header_is_401() {
        for value in ["ApiKeytest-key-123", "Bearer test-key-123"] {
            let res = test_router()
                .oneshot(get("/api/v1/whoami", Some(value)))
                .await
                .unwrap();

            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{value}");
            let body = json_body(res).await;
            assert_eq!(body["error"]["code"], "MALFORMED_AUTH_HEADER", "{value}");
            assert_eq!(
                body["error"]["message"], "malformed authorization header",
                "{value}"
            );
        }
    }

    #[tokio::test]
    async fn unknown_route_is_404_not_401() {
        let res = test_router()
            .oneshot(get("/api/v1/nope", None))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn incoming_request_id_is_propagated() {
        let req = Request::builder()
            .uri("/api/v1/health")
            .header("x-request-id", "req-123")
            .body(Body::empty())
            .unwrap();

        let res = test_router().oneshot(req).await.unwrap();

        assert_eq!(res.headers()["x-request-id"], "req-123");
    }

    #[tokio::test]
    async fn ctx_extractor_without_middleware_is_401() {
        let router = Router::new()
            .route("/unguarded", get_route(crate::api::v1::handlers::whoami::whoami))
            .with_state(AppState::new(AppEnv::Development));

        let res = router
            .oneshot(get("/unguarded", Some("ApiKey test-key-123")))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "ApiKey");
        let body = json_body(res).await;
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn production_cors_allows_listed_origin() {
        let config = test_config(AppEnv::Production, &["https://app.example"]);

        let res = router_for(&config)
            .oneshot(preflight("https://app.example"))
            .await
            .unwrap();

        assert_eq!(
            res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://app.example"
        );
        let allowed = res.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(allowed.contains("authorization"), "{allowed}");
    }

    #[tokio::test]
    async fn production_cors_rejects_unlisted_origin() {
        let config = test_config(AppEnv::Production, &["https://app.example"]);

        let res = router_for(&config)
            .oneshot(preflight("https://evil.example"))
            .await
            .unwrap();

        assert!(!res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn production_cors_with_empty_allowlist_allows_nothing() {
        let config = test_config(AppEnv::Production, &[]);

        let res = router_for(&config)
            .oneshot(preflight("https://app.example"))
            .await
            .unwrap();

        assert!(!res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn development_cors_allows_any_origin() {
        let res = test_router()
            .oneshot(preflight("https://anything.example"))
            .await
            .unwrap();

        assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn slow_request_times_out_with_408() {
        let mut config = test_config(AppEnv::Development, &[]);
        config.request_timeout = Duration::from_millis(50);

        let router = Router::new().route(
            "/slow",
            get_route(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "done"
            }),
        );
        let router = middleware::http::apply(router, &config);

        let res = router.oneshot(get("/slow", None)).await.unwrap();

        assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected_with_413() {
        let config = test_config(AppEnv::Development, &[]);
        let router = Router::new().route("/echo", post(|body: String| async move { body }));
        let router = middleware::http::apply(router, &config);

        let oversized = "a".repeat(config.request_body_limit_bytes + 1);
        let req = Request::builder()
            .method(Method::POST)
            .uri("/echo")
            .header(header::CONTENT_LENGTH, oversized.len())
            .body(Body::from(oversized))
            .unwrap();
        let res = router.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let req = Request::builder()
            .method(Method::POST)
            .uri("/echo")
            .body(Body::from("small"))
            .unwrap();
        let res = router.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
