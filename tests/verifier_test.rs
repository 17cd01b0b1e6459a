use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use opsgate::auth::user::{Role, UserRecord};
use opsgate::auth::verifier::{AuthError, CredentialVerifier};
use opsgate::error::{OpsGateError, Result};
use opsgate::security::hash_password;
use opsgate::storage::{MemoryUserStore, UserStore};

const STORE_TIMEOUT: Duration = Duration::from_secs(1);

async fn seeded_store() -> Arc<MemoryUserStore> {
    let store = Arc::new(MemoryUserStore::new());
    let record = UserRecord::new(
        "alice",
        "alice@x.com",
        &hash_password("pa55-correct-horse").unwrap(),
        Role::Admin,
    )
    .with_display_name("Alice")
    .with_avatar("https://cdn.example.com/alice.png");
    store.add_record(record).await;
    store
}

#[tokio::test]
async fn test_verify_by_email_or_username() {
    let store = seeded_store().await;
    let verifier = CredentialVerifier::new(store, STORE_TIMEOUT);

    let by_username = verifier.verify("alice", "pa55-correct-horse").await.unwrap();
    let by_email = verifier
        .verify("alice@x.com", "pa55-correct-horse")
        .await
        .unwrap();

    // Both identifier forms authenticate the same underlying record
    assert_eq!(by_username.id, by_email.id);
    assert_eq!(by_username.role, Role::Admin);
    assert_eq!(by_username.email, "alice@x.com");
    assert_eq!(by_username.display_name, "Alice");
    assert_eq!(
        by_username.avatar_url.as_deref(),
        Some("https://cdn.example.com/alice.png")
    );

    // The projection never carries the password hash
    let as_json = serde_json::to_value(&by_username).unwrap();
    assert!(as_json.get("password_hash").is_none());
}

#[tokio::test]
async fn test_wrong_password_on_either_identifier_form() {
    let store = seeded_store().await;
    let verifier = CredentialVerifier::new(store, STORE_TIMEOUT);

    assert_eq!(
        verifier.verify("alice", "wrong").await,
        Err(AuthError::InvalidPassword)
    );
    assert_eq!(
        verifier.verify("alice@x.com", "wrong").await,
        Err(AuthError::InvalidPassword)
    );
}

#[tokio::test]
async fn test_unknown_identifier_is_not_found() {
    let store = seeded_store().await;
    let verifier = CredentialVerifier::new(store, STORE_TIMEOUT);

    assert_eq!(
        verifier.verify("mallory", "whatever").await,
        Err(AuthError::NotFound)
    );
}

/// Counts lookups so tests can assert the store was never reached.
struct CountingStore {
    calls: AtomicUsize,
}

#[async_trait]
impl UserStore for CountingStore {
    async fn find_by_identifier(&self, _identifier: &str) -> Result<Option<UserRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

#[tokio::test]
async fn test_missing_input_rejected_before_store_access() {
    let store = Arc::new(CountingStore {
        calls: AtomicUsize::new(0),
    });
    let verifier = CredentialVerifier::new(store.clone(), STORE_TIMEOUT);

    assert_eq!(
        verifier.verify("", "some-password").await,
        Err(AuthError::MissingInput)
    );
    assert_eq!(
        verifier.verify("alice", "").await,
        Err(AuthError::MissingInput)
    );
    assert_eq!(
        verifier.verify("   ", "some-password").await,
        Err(AuthError::MissingInput)
    );

    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

struct FailingStore;

#[async_trait]
impl UserStore for FailingStore {
    async fn find_by_identifier(&self, _identifier: &str) -> Result<Option<UserRecord>> {
        Err(OpsGateError::StorageError("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_store_failure_is_not_not_found() {
    let verifier = CredentialVerifier::new(Arc::new(FailingStore), STORE_TIMEOUT);

    match verifier.verify("alice", "pa55-correct-horse").await {
        Err(AuthError::StoreUnavailable(msg)) => assert!(msg.contains("connection refused")),
        other => panic!("expected StoreUnavailable, got {:?}", other),
    }
}

struct SlowStore;

#[async_trait]
impl UserStore for SlowStore {
    async fn find_by_identifier(&self, _identifier: &str) -> Result<Option<UserRecord>> {
        tokio::time::sleep(Duration::from_millis(500)).await;
        Ok(None)
    }
}

#[tokio::test]
async fn test_slow_store_times_out_as_unavailable() {
    let verifier = CredentialVerifier::new(Arc::new(SlowStore), Duration::from_millis(50));

    match verifier.verify("alice", "pa55-correct-horse").await {
        Err(AuthError::StoreUnavailable(msg)) => assert!(msg.contains("timed out")),
        other => panic!("expected StoreUnavailable on timeout, got {:?}", other),
    }
}
