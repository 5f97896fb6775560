//! Request context carrying the authenticated actor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docflow_entity::user::{Capability, UserRole};

/// The reserved user ID for system-driven actions (expiry archival).
///
/// Seeded by the migrations so audit rows can reference it.
pub const SYSTEM_USER_ID: Uuid = Uuid::nil();

/// Context for the current request.
///
/// Extracted by the calling layer (controller, CLI, scheduler) and passed
/// into every service method, so each operation knows *who* is acting and
/// with which request metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID.
    pub user_id: Uuid,
    /// The acting user's role at the time the request was authenticated.
    pub role: UserRole,
    /// The acting user's department, if any.
    pub department_id: Option<Uuid>,
    /// IP address of the request origin.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        user_id: Uuid,
        role: UserRole,
        department_id: Option<Uuid>,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            user_id,
            role,
            department_id,
            ip_address,
            user_agent,
            request_time: Utc::now(),
        }
    }

    /// Context for system-driven actions such as the expiry sweep.
    pub fn system() -> Self {
        Self::new(SYSTEM_USER_ID, UserRole::SuperAdmin, None, None, None)
    }

    /// Whether the actor holds the given capability.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.role.has_capability(capability)
    }
}
