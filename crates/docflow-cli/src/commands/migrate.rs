//! `docflow migrate`

use anyhow::Result;

use docflow_core::config::AppConfig;
use docflow_database::{migration, DatabasePool};

/// Run pending database migrations.
pub async fn run(config: &AppConfig) -> Result<()> {
    let pool = DatabasePool::connect(&config.database).await?;
    migration::run_migrations(pool.pool()).await?;
    pool.close().await;

    println!("Migrations applied.");
    Ok(())
}
