//! PostgreSQL repository implementations of the store ports.

pub mod access;
pub mod approval;
pub mod document;
pub mod revision;

pub use access::PgAccessStore;
pub use approval::PgApprovalStore;
pub use document::PgDocumentStore;
pub use revision::PgRevisionStore;
