//! Black-box tests against the real router on an ephemeral port.
//!
//! The pool connects lazily, so everything exercised here (health, auth
//! gates, capability checks) runs without a live database; handlers that
//! would touch Postgres are not driven from these tests.

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;

use aquaflow_api::config::AppConfig;
use aquaflow_auth::{AuthClaims, Role};
use aquaflow_core::{OrgId, UserId};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        let config = AppConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            database_url: "postgres://localhost/aquaflow_test".to_string(),
            jwt_secret: jwt_secret.to_string(),
            db_acquire_timeout: Duration::from_secs(1),
            stock_out_tracking: false,
        };

        let pool = aquaflow_store::build_pool(&config.database_url, config.db_acquire_timeout)
            .expect("failed to configure pool");
        let app = aquaflow_api::app::build_app(&config, pool);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(jwt_secret: &str, role: Role) -> String {
    let now = Utc::now();
    let claims = AuthClaims {
        sub: UserId::new(1),
        email: "tester@example.com".to_string(),
        role,
        org_id: OrgId::new(1),
        issued_at: now,
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn("test-secret").await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let srv = TestServer::spawn("test-secret").await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let srv = TestServer::spawn("test-secret").await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn actor_context_is_derived_from_token() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;

    let token = mint_jwt(jwt_secret, Role::Admin);

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/whoami", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["email"].as_str().unwrap(), "tester@example.com");
    assert_eq!(body["role"].as_str().unwrap(), "admin");
    assert_eq!(body["org_id"].as_i64().unwrap(), 1);
}

#[tokio::test]
async fn customers_cannot_run_the_weekly_generator() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;

    let token = mint_jwt(jwt_secret, Role::Customer);

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/replenishment/generate", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "forbidden");
}

#[tokio::test]
async fn staff_cannot_mutate_stock_levels() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;

    let token = mint_jwt(jwt_secret, Role::Staff);

    let client = reqwest::Client::new();
    let res = client
        .put(format!("{}/replenishment/stock/1/2", srv.base_url))
        .bearer_auth(token)
        .json(&serde_json::json!({ "current_level": 5, "target_level": 10 }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn non_admins_cannot_read_other_orgs_notifications() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;

    // token carries org_id 1; org 2 is someone else's
    let token = mint_jwt(jwt_secret, Role::Staff);

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/notifications/org/2", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
