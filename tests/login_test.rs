use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use opsgate::auth::gate::{Gate, GateDecision};
use opsgate::auth::token::SessionCodec;
use opsgate::auth::user::{Role, UserRecord};
use opsgate::auth::verifier::CredentialVerifier;
use opsgate::error::{OpsGateError, Result};
use opsgate::handlers::auth::login_route;
use opsgate::storage::{MemoryUserStore, UserStore};

const SECRET: &str = "integration-testing-signing-key-f4a81c";

async fn login_filter() -> (
    impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone,
    Arc<SessionCodec>,
) {
    let store = Arc::new(MemoryUserStore::new());
    store
        .add_user("alice", "alice@x.com", "pa55-correct-horse", Role::User)
        .await
        .unwrap();

    let codec = Arc::new(SessionCodec::new(SECRET, Duration::from_secs(3600)));
    let verifier = Arc::new(CredentialVerifier::new(store, Duration::from_secs(1)));
    (login_route(verifier, codec.clone()), codec)
}

#[tokio::test]
async fn test_login_issues_usable_token_and_cookie() {
    let (filter, codec) = login_filter().await;

    let resp = warp::test::request()
        .method("POST")
        .path("/auth/login")
        .json(&serde_json::json!({
            "identifier": "alice",
            "password": "pa55-correct-horse"
        }))
        .reply(&filter)
        .await;

    assert_eq!(resp.status(), 200);

    let cookie = resp
        .headers()
        .get("set-cookie")
        .expect("login must set a session cookie")
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));

    let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
    let token = body["token"].as_str().unwrap();
    assert!(body["user"].get("password_hash").is_none());
    assert_eq!(body["user"]["email"], "alice@x.com");

    // The issued token passes the gate on a protected path
    let gate = Gate::new(codec, vec!["/auth".to_string(), "/api".to_string()]);
    match gate.decide("/dashboard", Some(token), Utc::now()) {
        GateDecision::Allow { claims: Some(claims) } => {
            assert_eq!(claims.role, Role::User);
        }
        other => panic!("expected Allow for fresh token, got {:?}", other),
    }
}

#[tokio::test]
async fn test_credential_failures_share_one_generic_reply() {
    let (filter, _codec) = login_filter().await;

    let wrong_password = warp::test::request()
        .method("POST")
        .path("/auth/login")
        .json(&serde_json::json!({
            "identifier": "alice@x.com",
            "password": "nope"
        }))
        .reply(&filter)
        .await;

    let unknown_user = warp::test::request()
        .method("POST")
        .path("/auth/login")
        .json(&serde_json::json!({
            "identifier": "mallory",
            "password": "nope"
        }))
        .reply(&filter)
        .await;

    let missing_input = warp::test::request()
        .method("POST")
        .path("/auth/login")
        .json(&serde_json::json!({}))
        .reply(&filter)
        .await;

    // Same status, same body: the reply must not leak which part was wrong
    for resp in [&wrong_password, &unknown_user, &missing_input] {
        assert_eq!(resp.status(), 401);
    }
    assert_eq!(wrong_password.body(), unknown_user.body());
    assert_eq!(wrong_password.body(), missing_input.body());
}

struct FailingStore;

#[async_trait]
impl UserStore for FailingStore {
    async fn find_by_identifier(&self, _identifier: &str) -> Result<Option<UserRecord>> {
        Err(OpsGateError::StorageError("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_store_outage_is_a_service_error_not_bad_credentials() {
    let codec = Arc::new(SessionCodec::new(SECRET, Duration::from_secs(3600)));
    let verifier = Arc::new(CredentialVerifier::new(
        Arc::new(FailingStore),
        Duration::from_secs(1),
    ));
    let filter = login_route(verifier, codec);

    let resp = warp::test::request()
        .method("POST")
        .path("/auth/login")
        .json(&serde_json::json!({
            "identifier": "alice",
            "password": "pa55-correct-horse"
        }))
        .reply(&filter)
        .await;

    assert_eq!(resp.status(), 503);
    let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
    assert_eq!(body["error"], "service unavailable");
}
