//! Application-level settings.

use serde::{Deserialize, Serialize};

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Company code used as the first segment of document numbers.
    #[serde(default = "default_company_code")]
    pub company_code: String,
    /// Public base URL used to build QR validation links.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            company_code: default_company_code(),
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_company_code() -> String {
    "AKM".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}
