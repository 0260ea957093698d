use std::sync::{Arc, Mutex};
use std::time::Duration;

use arkas_lojistik_api::{
    auth::{AuthConfig, AuthService},
    auth::identifier::Identifier,
    config::AppConfig,
    db,
    events::{self, EventSender},
    handlers::AppServices,
    middleware_helpers::request_id_middleware,
    notifications::Notifier,
    AppState,
};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
    middleware, Router,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

/// A delivered verification or reset code, captured instead of sent.
#[derive(Debug, Clone)]
pub struct DeliveredCode {
    pub target: String,
    pub code: String,
    pub reset: bool,
}

/// Notifier that records every code so tests can read it back.
#[derive(Default)]
pub struct CapturingNotifier {
    delivered: Mutex<Vec<DeliveredCode>>,
}

impl CapturingNotifier {
    pub fn last_code_for(&self, target: &str) -> Option<String> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|d| d.target == target)
            .map(|d| d.code.clone())
    }
}

#[async_trait]
impl Notifier for CapturingNotifier {
    async fn send_verification_code(
        &self,
        target: &Identifier,
        _full_name: &str,
        code: &str,
    ) -> Result<(), arkas_lojistik_api::errors::ServiceError> {
        self.delivered.lock().unwrap().push(DeliveredCode {
            target: target.as_str().to_string(),
            code: code.to_string(),
            reset: false,
        });
        Ok(())
    }

    async fn send_password_reset_code(
        &self,
        target: &Identifier,
        _full_name: &str,
        code: &str,
    ) -> Result<(), arkas_lojistik_api::errors::ServiceError> {
        self.delivered.lock().unwrap().push(DeliveredCode {
            target: target.as_str().to_string(),
            code: code.to_string(),
            reset: true,
        });
        Ok(())
    }
}

/// Spins up the full application against a fresh on-disk SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub notifier: Arc<CapturingNotifier>,
    _event_task: tokio::task::JoinHandle<()>,
    _db_dir: tempfile::TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_dir = tempfile::tempdir().expect("create temp dir for test database");
        let db_path = db_dir.path().join("arkas_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "test_secret_key_for_testing_purposes_only_32chars".to_string(),
            3600,
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");
        let db_arc = Arc::new(pool);

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let notifier = Arc::new(CapturingNotifier::default());
        let auth_cfg = AuthConfig::new(
            cfg.jwt_secret.clone(),
            Duration::from_secs(cfg.jwt_expiration_secs),
        )
        .expect("valid auth config for tests");
        let auth_service = Arc::new(AuthService::new(
            auth_cfg,
            db_arc.clone(),
            notifier.clone(),
            event_sender.clone(),
        ));

        let services = AppServices::new(db_arc.clone(), event_sender.clone());

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
            auth: auth_service,
        };

        let router = Router::new()
            .nest("/api", arkas_lojistik_api::api_routes())
            .layer(middleware::from_fn(request_id_middleware))
            .with_state(state.clone());

        Self {
            router,
            state,
            notifier,
            _event_task: event_task,
            _db_dir: db_dir,
        }
    }

    /// Sends a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

/// Reads a response body as JSON.
pub async fn read_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&body).expect("response body should be json")
}

/// Parses a money field, which serializes as a decimal string.
pub fn money(value: &Value) -> f64 {
    match value {
        Value::String(s) => s.parse().expect("money field should parse"),
        Value::Number(n) => n.as_f64().expect("money field should be finite"),
        other => panic!("unexpected money value: {other:?}"),
    }
}
