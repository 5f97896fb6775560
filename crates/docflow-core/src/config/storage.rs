//! File storage configuration.

use serde::{Deserialize, Serialize};

/// Storage configuration for document files and derived artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root path for local file storage.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Prefix under the root for document files.
    #[serde(default = "default_documents_prefix")]
    pub documents_prefix: String,
    /// Prefix under the root for QR code artifacts.
    #[serde(default = "default_qrcodes_prefix")]
    pub qrcodes_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            documents_prefix: default_documents_prefix(),
            qrcodes_prefix: default_qrcodes_prefix(),
        }
    }
}

fn default_root_path() -> String {
    "./data/storage".to_string()
}

fn default_documents_prefix() -> String {
    "documents".to_string()
}

fn default_qrcodes_prefix() -> String {
    "qrcodes".to_string()
}
