#![cfg(test)]
use configs::DatabaseConfig;
use migration::MigratorTrait;
use models::db::connect_with_config;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

// migrations run once per test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

fn test_config() -> DatabaseConfig {
    let mut cfg = DatabaseConfig::default();
    cfg.normalize_from_env();
    if cfg.url.trim().is_empty() {
        cfg.url = models::db::DATABASE_URL.clone();
    }
    cfg.min_connections = 1;
    cfg
}

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    MIGRATED
        .get_or_init(|| async {
            let db = connect_with_config(&test_config()).await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
        })
        .await;

    let mut cfg = test_config();
    cfg.max_connections = 20;
    cfg.acquire_timeout_secs = 10;
    connect_with_config(&cfg).await
}

/// Inserts a profile row so foreign keys resolve.
pub async fn seed_user(db: &DatabaseConnection, email_prefix: &str) -> Result<models::user_profile::Model, anyhow::Error> {
    use sea_orm::{ActiveModelTrait, IntoActiveModel};
    let user = crate::mappers::fixtures::user(&format!("{}-{}@church.org", email_prefix, uuid::Uuid::new_v4().simple()));
    Ok(user.into_active_model().reset_all().insert(db).await?)
}
