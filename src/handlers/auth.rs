use axum::{extract::State, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{AuthUser, RegisterInput, TokenResponse};
use crate::entities::user;
use crate::{ApiResponse, ApiResult, AppState};

/// Public view of an account.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub full_name: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserProfile {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            phone: model.phone,
            full_name: model.full_name,
            is_verified: model.is_verified,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Email address or Turkish mobile number
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyRequest {
    pub identifier: String,
    /// Six-digit code delivered out of band
    pub code: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct IdentifierRequest {
    pub identifier: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub identifier: String,
    pub code: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BiometricRegisterRequest {
    pub credential_id: String,
    pub public_key: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BiometricLoginRequest {
    pub credential_id: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterInput,
    responses(
        (status = 200, description = "Account created, verification code sent", body = UserProfile),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 409, description = "Account already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterInput>,
) -> ApiResult<UserProfile> {
    let created = state.auth.register(payload).await?;
    Ok(Json(ApiResponse::success_with_message(
        UserProfile::from(created),
        "Verification code sent".to_string(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Bearer token", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<TokenResponse> {
    let token = state
        .auth
        .login(&payload.identifier, &payload.password)
        .await?;
    Ok(Json(ApiResponse::success(token)))
}

#[utoipa::path(
    post,
    path = "/api/auth/verify",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Account verified"),
        (status = 400, description = "Wrong or expired code", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn verify(
    State(state): State<AppState>,
    Json(payload): Json<VerifyRequest>,
) -> ApiResult<serde_json::Value> {
    state.auth.verify(&payload.identifier, &payload.code).await?;
    Ok(Json(ApiResponse::success(json!({ "verified": true }))))
}

pub async fn resend_verification(
    State(state): State<AppState>,
    Json(payload): Json<IdentifierRequest>,
) -> ApiResult<serde_json::Value> {
    state.auth.resend_verification(&payload.identifier).await?;
    Ok(Json(ApiResponse::success(json!({ "sent": true }))))
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<IdentifierRequest>,
) -> ApiResult<serde_json::Value> {
    state.auth.forgot_password(&payload.identifier).await?;
    Ok(Json(ApiResponse::success(json!({ "sent": true }))))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> ApiResult<serde_json::Value> {
    state
        .auth
        .reset_password(&payload.identifier, &payload.code, &payload.new_password)
        .await?;
    Ok(Json(ApiResponse::success(json!({ "reset": true }))))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current account", body = UserProfile),
        (status = 401, description = "Missing or invalid token", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<UserProfile> {
    let user = state.auth.current_user(&claims).await?;
    Ok(Json(ApiResponse::success(UserProfile::from(user))))
}

pub async fn register_biometric(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<BiometricRegisterRequest>,
) -> ApiResult<serde_json::Value> {
    let user = state.auth.current_user(&claims).await?;
    let credential = state
        .auth
        .register_biometric(user.id, &payload.credential_id, &payload.public_key)
        .await?;
    Ok(Json(ApiResponse::success(json!({
        "credential_id": credential.credential_id,
        "registered": true
    }))))
}

pub async fn biometric_login(
    State(state): State<AppState>,
    Json(payload): Json<BiometricLoginRequest>,
) -> ApiResult<TokenResponse> {
    let token = state.auth.biometric_login(&payload.credential_id).await?;
    Ok(Json(ApiResponse::success(token)))
}
