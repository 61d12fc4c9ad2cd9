// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::app_data::AppData;
use crate::config::SecretManager;

pub const TEST_PEPPER: &str = "test-pepper-for-unit-tests";

/// Creates a migrated in-memory database with the role catalogue seeded
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Creates a fully wired AppData over a fresh in-memory database
pub async fn setup_test_app_data() -> Arc<AppData> {
    let db = setup_test_db().await;
    Arc::new(AppData::init(db, SecretManager::with_pepper(TEST_PEPPER)))
}
