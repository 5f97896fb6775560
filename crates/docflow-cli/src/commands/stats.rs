//! `docflow stats`

use anyhow::Result;

use docflow_core::config::AppConfig;
use docflow_database::repositories::PgDocumentStore;
use docflow_database::{DatabasePool, DocumentStore};
use docflow_entity::document::DocumentStatus;

/// Print document counts by status.
pub async fn run(config: &AppConfig) -> Result<()> {
    let pool = DatabasePool::connect(&config.database).await?;
    let documents = PgDocumentStore::new(pool.pool().clone());

    let counts = documents.count_by_status().await?;
    let total: i64 = counts.iter().map(|c| c.count).sum();

    println!("{:<16} {:>8}", "STATUS", "COUNT");
    for status in DocumentStatus::ALL {
        let count = counts
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.count)
            .unwrap_or(0);
        println!("{:<16} {:>8}", status.label(), count);
    }
    println!("{:<16} {:>8}", "Total", total);

    pool.close().await;
    Ok(())
}
