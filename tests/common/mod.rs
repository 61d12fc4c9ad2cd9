// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use medixscan_backend::app_data::AppData;
use medixscan_backend::build_app;
use medixscan_backend::config::SecretManager;
use medixscan_backend::providers::Registration;
use migration::{Migrator, MigratorTrait};
use poem::endpoint::BoxEndpoint;
use poem::test::TestClient;
use sea_orm::{Database, DatabaseConnection};

pub const TEST_PEPPER: &str = "integration-test-pepper";

/// Creates a migrated in-memory database
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Application wired against a fresh in-memory database
pub struct TestApp {
    pub app_data: Arc<AppData>,
    pub client: TestClient<BoxEndpoint<'static>>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = setup_test_db().await;
        let app_data = Arc::new(AppData::init(db, SecretManager::with_pepper(TEST_PEPPER)));
        let client = TestClient::new(build_app(app_data.clone(), "http://localhost:8000"));

        Self { app_data, client }
    }

    /// Create an approved account with no roles and return its id
    pub async fn approved_user(&self, email: &str, password: &str) -> String {
        let users = &self.app_data.providers.user_provider;
        let user = users
            .register(Registration {
                email: email.to_string(),
                password: password.to_string(),
                username: None,
                first_name: None,
                last_name: None,
            })
            .await
            .expect("Failed to register user");
        users
            .approve_by_email(email)
            .await
            .expect("Failed to approve user");

        user.id
    }

    /// Create a super-admin account and return its id
    pub async fn superuser(&self, email: &str, password: &str) -> String {
        let (user, _) = self
            .app_data
            .providers
            .user_provider
            .create_superuser(email, Some(password.to_string()), None)
            .await
            .expect("Failed to create superuser");

        user.id
    }

    /// Log in through the HTTP surface and return the token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let resp = self
            .client
            .post("/api/auth/login/")
            .body_json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await;
        resp.assert_status_is_ok();

        let json = resp.json().await;
        json.value().object().get("token").string().to_string()
    }
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop,
/// ensuring test isolation when dealing with global environment state.
pub struct EnvGuard {
    vars: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        for var in &vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }
}

/// Global mutex for tests that modify environment variables
///
/// Environment variables are process-global, so tests that modify them
/// must run serially to avoid race conditions.
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
