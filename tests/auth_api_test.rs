mod common;

use axum::http::{Method, StatusCode};
use common::{read_json, TestApp};
use serde_json::json;

const EMAIL: &str = "sofor@arkas.com.tr";
const PASSWORD: &str = "gizli-sifre";

async fn register(app: &TestApp) -> serde_json::Value {
    let response = app
        .request(
            Method::POST,
            "/api/auth/register",
            Some(json!({
                "email": EMAIL,
                "password": PASSWORD,
                "full_name": "Test Sofor"
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    read_json(response).await
}

async fn login_token(app: &TestApp) -> String {
    let body = read_json(
        app.request(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "identifier": EMAIL, "password": PASSWORD })),
            None,
        )
        .await,
    )
    .await;
    body["data"]["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_verify_login_me_flow() {
    let app = TestApp::new().await;

    let registered = register(&app).await;
    assert_eq!(registered["data"]["email"], EMAIL);
    assert_eq!(registered["data"]["is_verified"], false);
    // Password hash never leaks
    assert!(registered["data"].get("password_hash").is_none());

    let code = app
        .notifier
        .last_code_for(EMAIL)
        .expect("verification code delivered");
    assert_eq!(code.len(), 6);

    let response = app
        .request(
            Method::POST,
            "/api/auth/verify",
            Some(json!({ "identifier": EMAIL, "code": code })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let token = login_token(&app).await;
    let me = read_json(
        app.request(Method::GET, "/api/auth/me", None, Some(&token))
            .await,
    )
    .await;
    assert_eq!(me["data"]["email"], EMAIL);
    assert_eq!(me["data"]["is_verified"], true);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = TestApp::new().await;
    register(&app).await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/register",
            Some(json!({
                "email": EMAIL,
                "password": "baska-sifre",
                "full_name": "Baska Biri"
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn duplicate_phone_conflicts_even_with_fresh_email() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/register",
            Some(json!({
                "phone": "05321234567",
                "password": PASSWORD,
                "full_name": "Telefonlu Kullanici"
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // New email, already-registered phone
    let response = app
        .request(
            Method::POST,
            "/api/auth/register",
            Some(json!({
                "email": "yeni@arkas.com.tr",
                "phone": "+905321234567",
                "password": PASSWORD,
                "full_name": "Baska Biri"
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn phone_registration_is_normalized() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/register",
            Some(json!({
                "phone": "0532 123 45 67",
                "password": PASSWORD,
                "full_name": "Telefonlu Kullanici"
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["phone"], "+905321234567");

    // Login works with any accepted spelling of the same number
    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "identifier": "05321234567", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_code_and_wrong_password_are_rejected() {
    let app = TestApp::new().await;
    register(&app).await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/verify",
            Some(json!({ "identifier": EMAIL, "code": "000000" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "identifier": EMAIL, "password": "yanlis" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn password_reset_flow() {
    let app = TestApp::new().await;
    register(&app).await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/forgot-password",
            Some(json!({ "identifier": EMAIL })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let code = app
        .notifier
        .last_code_for(EMAIL)
        .expect("reset code delivered");

    let response = app
        .request(
            Method::POST,
            "/api/auth/reset-password",
            Some(json!({
                "identifier": EMAIL,
                "code": code,
                "new_password": "yeni-sifre"
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Old password no longer works, new one does
    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "identifier": EMAIL, "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "identifier": EMAIL, "password": "yeni-sifre" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn me_requires_a_valid_token() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(Method::GET, "/api/auth/me", None, Some("not-a-token"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn biometric_register_and_login() {
    let app = TestApp::new().await;
    register(&app).await;
    let token = login_token(&app).await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/biometric/register",
            Some(json!({
                "credential_id": "cred-abc123",
                "public_key": "pk-test"
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Same credential id cannot be registered twice
    let response = app
        .request(
            Method::POST,
            "/api/auth/biometric/register",
            Some(json!({
                "credential_id": "cred-abc123",
                "public_key": "pk-test"
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .request(
            Method::POST,
            "/api/auth/biometric/login",
            Some(json!({ "credential_id": "cred-abc123" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body["data"]["access_token"].is_string());

    let response = app
        .request(
            Method::POST,
            "/api/auth/biometric/login",
            Some(json!({ "credential_id": "bilinmeyen" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn resend_verification_only_for_unverified_accounts() {
    let app = TestApp::new().await;
    register(&app).await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/resend-verification",
            Some(json!({ "identifier": EMAIL })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let code = app.notifier.last_code_for(EMAIL).unwrap();
    app.request(
        Method::POST,
        "/api/auth/verify",
        Some(json!({ "identifier": EMAIL, "code": code })),
        None,
    )
    .await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/resend-verification",
            Some(json!({ "identifier": EMAIL })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
