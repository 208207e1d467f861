//! Request tracing must never record the query string.

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use userbase_api::{AppState, build_app};
use userbase_auth::{AuthKeys, AuthSessionManager};
use userbase_cache::CacheManager;
use userbase_core::config::{
    AppConfig, AuthConfig, CacheConfig, DatabaseConfig, EmailConfig, FirstSuperUserConfig,
    LoggingConfig, ServerConfig, WorkerConfig,
};
use userbase_core::result::AppResult;
use userbase_core::traits::{EmailDispatcher, EmailMessage, EnqueueOptions};
use userbase_database::directory::{InMemoryItemStore, InMemoryUserDirectory};
use userbase_service::{ItemService, UserService};

#[derive(Debug)]
struct DiscardDispatcher;

#[async_trait]
impl EmailDispatcher for DiscardDispatcher {
    async fn enqueue(&self, _email: EmailMessage, _options: EnqueueOptions) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn state() -> AppState {
    let config = AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
        },
        cache: CacheConfig::default(),
        auth: AuthConfig {
            access_token_private_key: include_str!(
                "../../userbase-auth/tests/fixtures/access_private.b64"
            )
            .to_string(),
            access_token_public_key: include_str!(
                "../../userbase-auth/tests/fixtures/access_public.b64"
            )
            .to_string(),
            refresh_token_private_key: include_str!(
                "../../userbase-auth/tests/fixtures/refresh_private.b64"
            )
            .to_string(),
            refresh_token_public_key: include_str!(
                "../../userbase-auth/tests/fixtures/refresh_public.b64"
            )
            .to_string(),
            ..AuthConfig::default()
        },
        first_super_user: FirstSuperUserConfig::default(),
        email: EmailConfig::default(),
        worker: WorkerConfig::default(),
        logging: LoggingConfig::default(),
    };

    let users = Arc::new(InMemoryUserDirectory::new());
    let cache = CacheManager::in_memory();
    let mail: Arc<dyn EmailDispatcher> = Arc::new(DiscardDispatcher);
    let sessions = AuthSessionManager::new(
        users.clone(),
        cache.clone(),
        Arc::new(AuthKeys::from_config(&config.auth).unwrap()),
        mail.clone(),
        config.auth.clone(),
        config.email.clone(),
    );
    let user_service = Arc::new(UserService::new(
        users,
        sessions.clone(),
        mail,
        config.email.clone(),
        config.first_super_user.clone(),
    ));

    AppState {
        config: Arc::new(config),
        db_pool: None,
        cache,
        sessions,
        user_service,
        item_service: Arc::new(ItemService::new(Arc::new(InMemoryItemStore::new()))),
    }
}

#[tokio::test]
async fn test_request_span_omits_query_string() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let router = build_app(state());
    let response = router
        .clone()
        .oneshot(
            Request::get("/auth/verifyemail?code=do-not-log-this-code")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .oneshot(
            Request::patch("/auth/resetpassword?code=do-not-log-this-either")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"new_password":"abcdefgh","confirm_password":"abcdefgh"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let output = logs.contents();
    assert!(output.contains("request{"), "no request span in: {output}");
    assert!(output.contains("path=/auth/verifyemail"));
    assert!(output.contains("path=/auth/resetpassword"));
    assert!(!output.contains("do-not-log-this-code"), "{output}");
    assert!(!output.contains("do-not-log-this-either"), "{output}");
}
