//! Integration tests for the Redis revocation store
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p tw_infra --test redis_integration -- --ignored

use std::sync::Arc;
use std::time::Duration;

use tw_core::context::RequestContext;
use tw_core::errors::TokenError;
use tw_core::repositories::RevocationStore;
use tw_core::services::{Authenticator, JwtAuthenticator, SigningConfig};
use tw_infra::cache::{CacheConfig, RedisRevocationStore};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

fn test_config(prefix: &str) -> CacheConfig {
    CacheConfig::new(
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
    )
    .with_prefix(format!("tokenward:test:{}:", prefix))
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_set_check_delete() {
    init_tracing();
    let store = RedisRevocationStore::connect(test_config("ops")).await.unwrap();
    let ctx = RequestContext::with_timeout(Duration::from_secs(2));

    store.set(&ctx, "token-a", Duration::from_secs(60)).await.unwrap();

    assert!(store.check(&ctx, "token-a").await.unwrap());
    assert!(!store.check(&ctx, "token-b").await.unwrap());
    assert!(store.delete(&ctx, "token-a").await.unwrap());
    assert!(!store.check(&ctx, "token-a").await.unwrap());

    store.close().await.unwrap();
    store.close().await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_record_expires_with_ttl() {
    init_tracing();
    let store = RedisRevocationStore::connect(test_config("ttl")).await.unwrap();
    let ctx = RequestContext::background();

    store.set(&ctx, "short-lived", Duration::from_millis(1200)).await.unwrap();
    assert!(store.check(&ctx, "short-lived").await.unwrap());

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(!store.check(&ctx, "short-lived").await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_authenticator_revocation_round_trip() {
    init_tracing();
    let store = Arc::new(RedisRevocationStore::connect(test_config("authn")).await.unwrap());
    let config = SigningConfig::builder()
        .secret("integration-secret")
        .issuer("svc")
        .build()
        .unwrap();
    let auth = JwtAuthenticator::new(config, Some(store.clone())).unwrap();
    let ctx = RequestContext::with_timeout(Duration::from_secs(2));

    let issued = auth.sign(&ctx, "user-42").await.unwrap();
    assert_eq!(auth.parse_claims(&ctx, issued.token()).await.unwrap().sub, "user-42");

    auth.destroy(&ctx, issued.token()).await.unwrap();
    assert!(matches!(
        auth.parse_claims(&ctx, issued.token()).await,
        Err(TokenError::Revoked)
    ));

    auth.release().await.unwrap();
    assert!(store.client().is_closed().await);
    assert!(matches!(
        auth.parse_claims(&ctx, issued.token()).await,
        Err(TokenError::StoreFailure(_))
    ));
}
