use axum::{extract::FromRequestParts, http::Request};
use bson::oid::ObjectId;
use jsonwebtoken::{Header, encode};
use serde_json::json;

use storefront_api::{
    error::AppError,
    middleware::auth::{AuthUser, ensure_admin, verify_token},
    models::Role,
    services::auth_service::issue_token,
    state::AuthKeys,
};

fn keys() -> AuthKeys {
    AuthKeys::new("test-secret")
}

#[test]
fn issued_token_roundtrips() {
    let keys = keys();
    let user_id = ObjectId::new();

    let token = issue_token(&keys, user_id, Role::Admin).expect("token");
    let decoded = verify_token(&keys, &token).expect("verified");

    assert_eq!(decoded.user_id, user_id);
    assert_eq!(decoded.role, Role::Admin);
}

#[test]
fn expired_token_is_rejected() {
    let keys = keys();
    // Well past the validator's leeway.
    let claims = json!({
        "sub": ObjectId::new().to_hex(),
        "role": "customer",
        "exp": chrono::Utc::now().timestamp() - 3600,
    });
    let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");

    let err = verify_token(&keys, &token).expect_err("expired");
    assert!(matches!(err, AppError::ExpiredToken));
}

#[test]
fn garbage_token_is_rejected() {
    let err = verify_token(&keys(), "definitely-not-a-jwt").expect_err("garbage");
    assert!(matches!(err, AppError::InvalidSignature));
}

#[test]
fn token_signed_with_another_secret_is_rejected() {
    let token = issue_token(&AuthKeys::new("other-secret"), ObjectId::new(), Role::Customer)
        .expect("token");

    let err = verify_token(&keys(), &token).expect_err("wrong secret");
    assert!(matches!(err, AppError::InvalidSignature));
}

#[test]
fn token_with_non_object_id_subject_is_rejected() {
    let keys = keys();
    let claims = json!({
        "sub": "bob",
        "role": "customer",
        "exp": chrono::Utc::now().timestamp() + 3600,
    });
    let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");

    let err = verify_token(&keys, &token).expect_err("bad subject");
    assert!(matches!(err, AppError::InvalidSignature));
}

#[test]
fn non_admin_is_forbidden() {
    let customer = AuthUser {
        user_id: ObjectId::new(),
        role: Role::Customer,
    };
    let admin = AuthUser {
        user_id: ObjectId::new(),
        role: Role::Admin,
    };

    assert!(matches!(
        ensure_admin(&customer),
        Err(AppError::Forbidden)
    ));
    assert!(ensure_admin(&admin).is_ok());
}

#[tokio::test]
async fn extractor_rejects_missing_and_malformed_headers() {
    let keys = keys();

    let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
    let err = AuthUser::from_request_parts(&mut parts, &keys)
        .await
        .expect_err("no header");
    assert!(matches!(err, AppError::InvalidSignature));

    let (mut parts, _) = Request::builder()
        .header("Authorization", "Token abc")
        .body(())
        .unwrap()
        .into_parts();
    let err = AuthUser::from_request_parts(&mut parts, &keys)
        .await
        .expect_err("wrong scheme");
    assert!(matches!(err, AppError::InvalidSignature));
}

#[tokio::test]
async fn extractor_accepts_a_valid_bearer_token() {
    let keys = keys();
    let user_id = ObjectId::new();
    let token = issue_token(&keys, user_id, Role::Customer).expect("token");

    let (mut parts, _) = Request::builder()
        .header("Authorization", format!("Bearer {token}"))
        .body(())
        .unwrap()
        .into_parts();

    let user = AuthUser::from_request_parts(&mut parts, &keys)
        .await
        .expect("extracted");
    assert_eq!(user.user_id, user_id);
}
