//! Nakliye Kontrol Sistemi API
//!
//! Record keeping for Arkas Lojistik transport hauls: nakliye records and
//! their charge breakdown, deposited amounts, JSON backups and accounts.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod notifications;
pub mod openapi;
pub mod services;
pub mod tracing;

use std::sync::Arc;

use axum::{extract::State, response::Json, routing::get, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
    pub auth: Arc<auth::AuthService>,
}

impl AppState {
    pub fn nakliye_service(&self) -> &services::nakliye::NakliyeService {
        &self.services.nakliye
    }

    pub fn yatan_tutar_service(&self) -> &services::yatan_tutar::YatanTutarService {
        &self.services.yatan_tutar
    }

    pub fn backup_service(&self) -> &services::backup::BackupService {
        &self.services.backup
    }

    pub fn reports_service(&self) -> &services::reports::ReportsService {
        &self.services.reports
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            message: Some(message),
            ..Self::success(data)
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some("Validation failed".to_string()),
            errors: Some(errors),
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Everything the service exposes under `/api`.
pub fn api_routes() -> Router<AppState> {
    let nakliye = Router::new()
        .route(
            "/nakliye",
            get(handlers::nakliye::list_nakliye).post(handlers::nakliye::create_nakliye),
        )
        .route(
            "/nakliye/bulk-delete",
            axum::routing::post(handlers::nakliye::bulk_delete_nakliye),
        )
        .route(
            "/nakliye/search/{term}",
            get(handlers::nakliye::search_nakliye),
        )
        .route(
            "/nakliye/period/{year}/{month}",
            get(handlers::nakliye::list_nakliye_period),
        )
        .route(
            "/nakliye/{id}",
            get(handlers::nakliye::get_nakliye)
                .put(handlers::nakliye::update_nakliye)
                .delete(handlers::nakliye::delete_nakliye),
        );

    let yatan_tutar = Router::new()
        .route(
            "/yatan-tutar",
            get(handlers::yatan_tutar::list_yatan_tutar)
                .post(handlers::yatan_tutar::create_yatan_tutar),
        )
        .route(
            "/yatan-tutar/{id}",
            get(handlers::yatan_tutar::get_yatan_tutar)
                .put(handlers::yatan_tutar::update_yatan_tutar)
                .delete(handlers::yatan_tutar::delete_yatan_tutar),
        );

    let backup = Router::new()
        .route("/backup/export", get(handlers::backup::export_backup))
        .route(
            "/backup/import",
            axum::routing::post(handlers::backup::import_backup),
        );

    let reports = Router::new().route("/reports/summary", get(handlers::reports::summary_report));

    let auth_routes = Router::new()
        .route("/auth/register", axum::routing::post(handlers::auth::register))
        .route("/auth/login", axum::routing::post(handlers::auth::login))
        .route("/auth/verify", axum::routing::post(handlers::auth::verify))
        .route(
            "/auth/resend-verification",
            axum::routing::post(handlers::auth::resend_verification),
        )
        .route(
            "/auth/forgot-password",
            axum::routing::post(handlers::auth::forgot_password),
        )
        .route(
            "/auth/reset-password",
            axum::routing::post(handlers::auth::reset_password),
        )
        .route("/auth/me", get(handlers::auth::me))
        .route(
            "/auth/biometric/register",
            axum::routing::post(handlers::auth::register_biometric),
        )
        .route(
            "/auth/biometric/login",
            axum::routing::post(handlers::auth::biometric_login),
        );

    Router::new()
        .route("/", get(api_root))
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .merge(nakliye)
        .merge(yatan_tutar)
        .merge(backup)
        .merge(reports)
        .merge(auth_routes)
}

async fn api_root() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success(json!({
        "message": "Nakliye Kontrol Sistemi API",
    })))
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let status_data = json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "arkas-lojistik-api",
        "timestamp": Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-123"), async {
                ApiResponse::success("ok")
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[tokio::test]
    async fn error_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-err"), async {
                ApiResponse::<()>::error("oops".into())
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-err"));
        assert!(!meta.timestamp.is_empty());
    }

    #[test]
    fn success_with_message_keeps_data() {
        let response = ApiResponse::success_with_message("ok", "done".into());
        assert!(response.success);
        assert_eq!(response.data, Some("ok"));
        assert_eq!(response.message.as_deref(), Some("done"));
    }
}
