//! Document service: creation, files, metadata, access tracking.

pub mod service;

pub use service::{AttachFile, DocumentService, DocumentStatistics, RecordAccess};
