//! Access records: one append-only row per view/download attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// What kind of access was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "access_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccessKind {
    /// The document was viewed.
    View,
    /// The document file was downloaded.
    Download,
}

/// Through which channel the document was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "access_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccessMethod {
    /// Regular web UI.
    Web,
    /// API client.
    Api,
    /// Scanned QR code.
    QrCode,
    /// Direct link.
    DirectLink,
}

/// Device information parsed from a User-Agent header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// "desktop", "mobile", "tablet", or "unknown".
    pub device_type: String,
    /// Browser family.
    pub browser: String,
    /// Operating system family.
    pub platform: String,
}

impl DeviceInfo {
    /// Best-effort classification of a User-Agent string.
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        let Some(ua) = user_agent else {
            return Self::unknown();
        };

        let is_tablet = ua.contains("iPad") || ua.contains("Tablet");
        let is_mobile =
            is_tablet || ua.contains("Mobile") || ua.contains("Android") || ua.contains("iPhone");
        let device_type = if is_tablet {
            "tablet"
        } else if is_mobile {
            "mobile"
        } else {
            "desktop"
        };

        let browser = if ua.contains("Edge") || ua.contains("Edg/") {
            "Edge"
        } else if ua.contains("Chrome") {
            "Chrome"
        } else if ua.contains("Firefox") {
            "Firefox"
        } else if ua.contains("Safari") {
            "Safari"
        } else {
            "unknown"
        };

        let platform = if ua.contains("Windows") {
            "Windows"
        } else if ua.contains("Android") {
            "Android"
        } else if ua.contains("iPhone") || ua.contains("iPad") || ua.contains("iOS") {
            "iOS"
        } else if ua.contains("Mac") {
            "macOS"
        } else if ua.contains("Linux") {
            "Linux"
        } else {
            "unknown"
        };

        Self {
            device_type: device_type.to_string(),
            browser: browser.to_string(),
            platform: platform.to_string(),
        }
    }

    fn unknown() -> Self {
        Self {
            device_type: "unknown".to_string(),
            browser: "unknown".to_string(),
            platform: "unknown".to_string(),
        }
    }
}

/// An immutable record of one view/download attempt.
///
/// High volume; never mutated. Retention pruning is an external concern.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccessRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// The accessed document.
    pub document_id: Uuid,
    /// The accessing user, if authenticated.
    pub user_id: Option<Uuid>,
    /// View or download.
    pub kind: AccessKind,
    /// Access channel.
    pub method: AccessMethod,
    /// Device classification.
    pub device_type: String,
    /// Browser family.
    pub browser: String,
    /// Operating system family.
    pub platform: String,
    /// IP address of the request.
    pub ip_address: Option<String>,
    /// Raw User-Agent header.
    pub user_agent: Option<String>,
    /// Whether the access succeeded.
    pub is_successful: bool,
    /// Failure detail for unsuccessful accesses.
    pub error_message: Option<String>,
    /// Bytes served for downloads.
    pub bytes_served: Option<i64>,
    /// When the access happened.
    pub created_at: DateTime<Utc>,
}

/// Data for appending a new access record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccessRecord {
    /// The accessed document.
    pub document_id: Uuid,
    /// The accessing user, if authenticated.
    pub user_id: Option<Uuid>,
    /// View or download.
    pub kind: AccessKind,
    /// Access channel.
    pub method: AccessMethod,
    /// IP address of the request.
    pub ip_address: Option<String>,
    /// Raw User-Agent header.
    pub user_agent: Option<String>,
    /// Whether the access succeeded.
    pub is_successful: bool,
    /// Failure detail for unsuccessful accesses.
    pub error_message: Option<String>,
    /// Bytes served for downloads.
    pub bytes_served: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_chrome() {
        let info = DeviceInfo::from_user_agent(Some(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36",
        ));
        assert_eq!(info.device_type, "desktop");
        assert_eq!(info.browser, "Chrome");
        assert_eq!(info.platform, "Windows");
    }

    #[test]
    fn test_iphone_safari() {
        let info = DeviceInfo::from_user_agent(Some(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1",
        ));
        assert_eq!(info.device_type, "mobile");
        assert_eq!(info.browser, "Safari");
        assert_eq!(info.platform, "iOS");
    }

    #[test]
    fn test_missing_user_agent() {
        let info = DeviceInfo::from_user_agent(None);
        assert_eq!(info.device_type, "unknown");
    }
}
