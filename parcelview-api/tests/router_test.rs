/// Router-level tests for the Parcelview API
///
/// These tests exercise the full middleware and routing stack with a lazily
/// connected pool, covering the paths that are decided before any query
/// runs: health degradation, authentication gating, strict parameter
/// parsing, and token-format rejection. Flows that need data are covered by
/// the unit tests in the shared crate.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use parcelview_api::app::{build_router, AppState};
use parcelview_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use parcelview_shared::auth::jwt::{create_token, Claims, TokenType};
use sqlx::postgres::PgPoolOptions;
use tower::Service as _;
use uuid::Uuid;

const TEST_SECRET: &str = "router-test-secret-key-32-bytes-min!";

/// Builds the app against an unreachable database
///
/// `connect_lazy` defers connection until a handler actually queries, so
/// everything decided before that point behaves exactly as in production.
fn test_app() -> axum::Router {
    let config = Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            production: false,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://nobody@127.0.0.1:1/parcelview_test".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
        email: None,
    };

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy(&config.database.url)
        .expect("pool options should parse");

    build_router(AppState::new(pool, config))
}

fn bearer() -> String {
    let claims = Claims::new(Uuid::new_v4(), TokenType::Access);
    format!("Bearer {}", create_token(&claims, TEST_SECRET).unwrap())
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_reports_degraded_without_database() {
    let mut app = test_app();

    let response = app
        .call(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["database"], "disconnected");
}

#[tokio::test]
async fn test_protected_routes_require_a_session() {
    let mut app = test_app();

    for (method, uri) in [
        ("GET", "/v1/properties/locations"),
        ("GET", "/v1/properties/save"),
        ("GET", "/v1/team/members"),
        ("GET", "/v1/dashboard/stats"),
        ("POST", "/v1/invitations"),
        ("POST", "/v1/user/check-permission"),
    ] {
        let response = app
            .call(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {uri} should require auth",
        );
    }
}

#[tokio::test]
async fn test_garbage_bearer_token_is_rejected() {
    let mut app = test_app();

    let response = app
        .call(
            Request::builder()
                .uri("/v1/properties/locations")
                .header("authorization", "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_numeric_search_param_is_a_bad_request() {
    let mut app = test_app();

    let response = app
        .call(
            Request::builder()
                .uri("/v1/properties/locations?minSqft=abc")
                .header("authorization", bearer())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Rejected at parse time, before any store access.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "bad_request");
    assert!(json["message"].as_str().unwrap().contains("minSqft"));
}

#[tokio::test]
async fn test_unknown_sort_key_is_a_bad_request() {
    let mut app = test_app();

    let response = app
        .call(
            Request::builder()
                .uri("/v1/properties/locations?sortBy=alphabetical")
                .header("authorization", bearer())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validate_without_token_is_a_bad_request() {
    let mut app = test_app();

    let response = app
        .call(
            Request::builder()
                .uri("/v1/invitations/validate")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validate_with_malformed_token_is_not_found() {
    let mut app = test_app();

    let response = app
        .call(
            Request::builder()
                .uri("/v1/invitations/validate?token=definitely-not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Malformed tokens are short-circuited without a store lookup.
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_permission_name_is_a_bad_request() {
    let mut app = test_app();

    let response = app
        .call(
            Request::builder()
                .method("POST")
                .uri("/v1/user/check-permission")
                .header("authorization", bearer())
                .header("content-type", "application/json")
                .body(Body::from(r#"{"permission":"billing"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_security_headers_are_present() {
    let mut app = test_app();

    let response = app
        .call(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );
}
