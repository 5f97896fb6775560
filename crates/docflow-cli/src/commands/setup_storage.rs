//! `docflow setup-storage`

use anyhow::Result;

use docflow_core::config::AppConfig;
use docflow_core::traits::StorageProvider;
use docflow_entity::document::DocumentStatus;
use docflow_storage::layout::folder_for_status;
use docflow_storage::LocalStorageProvider;

/// Create the canonical storage folder tree.
pub async fn run(config: &AppConfig) -> Result<()> {
    let provider = LocalStorageProvider::new(&config.storage.root_path).await?;

    let mut folders: Vec<String> = DocumentStatus::ALL
        .iter()
        .map(|status| {
            format!(
                "{}/{}",
                config.storage.documents_prefix,
                folder_for_status(*status)
            )
        })
        .collect();
    folders.sort();
    folders.dedup();
    folders.push(config.storage.qrcodes_prefix.clone());

    for folder in &folders {
        provider.create_dir(folder).await?;
        println!("Created {folder}");
    }

    println!("Storage tree ready under {}.", config.storage.root_path);
    Ok(())
}
