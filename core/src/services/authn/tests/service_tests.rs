//! Unit tests for signing and verification

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Duration as ChronoDuration;
use std::time::Duration;

use super::mocks::*;
use crate::context::RequestContext;
use crate::domain::entities::token::TokenState;
use crate::errors::TokenError;
use crate::services::authn::{Authenticator, SigningConfig};

fn decode_segment(token: &str, index: usize) -> serde_json::Value {
    let segment = token.split('.').nth(index).unwrap();
    serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segment).unwrap()).unwrap()
}

#[tokio::test]
async fn test_two_hour_token_for_service_issuer() {
    let clock = clock_at_t0();
    let config = SigningConfig::builder()
        .secret(SECRET)
        .issuer("svc")
        .lifetime(Duration::from_secs(2 * 60 * 60))
        .build()
        .unwrap();
    let auth = authenticator(config, None, &clock);
    let ctx = RequestContext::background();

    let issued = auth.sign(&ctx, "user-42").await.unwrap();
    assert_eq!(issued.expires_at(), T0 + 7200);
    assert_eq!(issued.token_type(), "Bearer");

    let claims = auth.parse_claims(&ctx, issued.token()).await.unwrap();
    assert_eq!(claims.sub, "user-42");
    assert_eq!(claims.iss, "svc");
    assert_eq!(claims.iat, T0);
    assert_eq!(claims.nbf, T0);
    assert_eq!(claims.exp, T0 + 7200);

    clock.advance(ChronoDuration::seconds(7199));
    assert!(auth.parse_claims(&ctx, issued.token()).await.is_ok());

    clock.advance(ChronoDuration::seconds(1));
    assert!(matches!(
        auth.parse_claims(&ctx, issued.token()).await,
        Err(TokenError::Expired)
    ));
}

#[tokio::test]
async fn test_default_lifetime_and_type() {
    let clock = clock_at_t0();
    let auth = authenticator(hs256_config(), None, &clock);

    let issued = auth.sign(&RequestContext::background(), "user-1").await.unwrap();

    assert_eq!(issued.expires_at() - T0, 2 * 60 * 60);
    assert_eq!(issued.authorization_value(), format!("Bearer {}", issued.token()));
}

#[tokio::test]
async fn test_header_and_payload_layout() {
    let clock = clock_at_t0();
    let auth = authenticator(hs256_config(), None, &clock);

    let issued = auth.sign(&RequestContext::background(), "user-1").await.unwrap();
    let header = decode_segment(issued.token(), 0);
    let payload = decode_segment(issued.token(), 1);

    assert_eq!(header, serde_json::json!({"alg": "HS256", "typ": "JWT"}));
    assert_eq!(payload["sub"], "user-1");
    assert!(payload.get("iss").is_none());
    assert_eq!(payload["exp"], T0 + 7200);
}

#[tokio::test]
async fn test_custom_header_fields_are_stamped() {
    let clock = clock_at_t0();
    let config = SigningConfig::builder()
        .secret(SECRET)
        .header("kid", "key-2024")
        .header("region", "eu-west")
        .build()
        .unwrap();
    let auth = authenticator(config, None, &clock);
    let ctx = RequestContext::background();

    let issued = auth.sign(&ctx, "user-1").await.unwrap();
    let header = decode_segment(issued.token(), 0);

    assert_eq!(header["alg"], "HS256");
    assert_eq!(header["typ"], "JWT");
    assert_eq!(header["kid"], "key-2024");
    assert_eq!(header["region"], "eu-west");
    assert!(auth.parse_claims(&ctx, issued.token()).await.is_ok());
}

#[tokio::test]
async fn test_custom_token_type() {
    let clock = clock_at_t0();
    let config = SigningConfig::builder()
        .secret(SECRET)
        .token_type("JWT")
        .build()
        .unwrap();
    let auth = authenticator(config, None, &clock);

    let issued = auth.sign(&RequestContext::background(), "user-1").await.unwrap();

    assert_eq!(issued.token_type(), "JWT");
}

#[tokio::test]
async fn test_empty_subject_is_not_signed() {
    let clock = clock_at_t0();
    let auth = authenticator(hs256_config(), None, &clock);

    let result = auth.sign(&RequestContext::background(), "").await;

    assert!(matches!(result, Err(TokenError::SigningFailed)));
}

#[tokio::test]
async fn test_not_yet_valid_and_leeway() {
    let clock = clock_at_t0();
    let strict = authenticator(hs256_config(), None, &clock);
    let lenient = authenticator(
        SigningConfig::builder().secret(SECRET).leeway(30).build().unwrap(),
        None,
        &clock,
    );
    let ctx = RequestContext::background();

    let issued = strict.sign(&ctx, "user-1").await.unwrap();
    clock.advance(ChronoDuration::seconds(-10));

    assert!(matches!(
        strict.parse_claims(&ctx, issued.token()).await,
        Err(TokenError::NotYetValid)
    ));
    assert!(lenient.parse_claims(&ctx, issued.token()).await.is_ok());

    clock.advance(ChronoDuration::seconds(10 + 7200 + 29));
    assert!(lenient.parse_claims(&ctx, issued.token()).await.is_ok());
    clock.advance(ChronoDuration::seconds(1));
    assert!(matches!(
        lenient.parse_claims(&ctx, issued.token()).await,
        Err(TokenError::Expired)
    ));
}

#[tokio::test]
async fn test_wrong_secret_fails_verification() {
    let clock = clock_at_t0();
    let signer = authenticator(
        SigningConfig::builder().secret("another-secret").build().unwrap(),
        None,
        &clock,
    );
    let verifier = authenticator(hs256_config(), None, &clock);
    let ctx = RequestContext::background();

    let issued = signer.sign(&ctx, "user-1").await.unwrap();

    assert!(matches!(
        verifier.parse_claims(&ctx, issued.token()).await,
        Err(TokenError::VerificationFailed)
    ));
}

#[tokio::test]
async fn test_tampered_payload_fails_verification() {
    let clock = clock_at_t0();
    let auth = authenticator(hs256_config(), None, &clock);
    let ctx = RequestContext::background();

    let issued = auth.sign(&ctx, "user-1").await.unwrap();
    let parts: Vec<&str> = issued.token().split('.').collect();
    let forged_payload = URL_SAFE_NO_PAD.encode(
        serde_json::json!({"sub": "admin", "iat": T0, "nbf": T0, "exp": T0 + 7200}).to_string(),
    );
    let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

    assert!(matches!(
        auth.parse_claims(&ctx, &forged).await,
        Err(TokenError::VerificationFailed)
    ));
}

#[tokio::test]
async fn test_issuer_mismatch_fails_verification() {
    let clock = clock_at_t0();
    let other = authenticator(
        SigningConfig::builder().secret(SECRET).issuer("other").build().unwrap(),
        None,
        &clock,
    );
    let svc = authenticator(
        SigningConfig::builder().secret(SECRET).issuer("svc").build().unwrap(),
        None,
        &clock,
    );
    let ctx = RequestContext::background();

    let issued = other.sign(&ctx, "user-1").await.unwrap();

    assert!(matches!(
        svc.parse_claims(&ctx, issued.token()).await,
        Err(TokenError::VerificationFailed)
    ));
}

#[tokio::test]
async fn test_malformed_inputs() {
    let clock = clock_at_t0();
    let auth = authenticator(hs256_config(), None, &clock);
    let ctx = RequestContext::background();
    let missing_alg = format!("{}.e30.sig", URL_SAFE_NO_PAD.encode("{}"));

    for token in [
        "",
        "abc",
        "a.b",
        "a.b.c.d",
        ".e30.sig",
        "!!!.e30.sig",
        missing_alg.as_str(),
    ] {
        assert!(
            matches!(auth.parse_claims(&ctx, token).await, Err(TokenError::Malformed)),
            "expected Malformed for {:?}",
            token
        );
    }
}

#[tokio::test]
async fn test_inspect_reports_state() {
    let clock = clock_at_t0();
    let auth = authenticator(hs256_config(), None, &clock);
    let ctx = RequestContext::background();

    let issued = auth.sign(&ctx, "user-1").await.unwrap();
    assert_eq!(auth.inspect(&ctx, issued.token()).await.unwrap(), TokenState::Valid);

    clock.advance(ChronoDuration::seconds(-1));
    assert_eq!(
        auth.inspect(&ctx, issued.token()).await.unwrap(),
        TokenState::NotYetValid
    );

    clock.advance(ChronoDuration::hours(3));
    assert_eq!(auth.inspect(&ctx, issued.token()).await.unwrap(), TokenState::Expired);

    assert!(matches!(
        auth.inspect(&ctx, "garbage").await,
        Err(TokenError::Malformed)
    ));
}

#[tokio::test]
async fn test_issued_token_json_encoding() {
    let clock = clock_at_t0();
    let auth = authenticator(hs256_config(), None, &clock);

    let issued = auth.sign(&RequestContext::background(), "user-1").await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&issued.to_json().unwrap()).unwrap();

    assert_eq!(json["token"], issued.token());
    assert_eq!(json["type"], "Bearer");
    assert_eq!(json["expireAt"], T0 + 7200);
}
