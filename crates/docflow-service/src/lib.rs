//! # docflow-service
//!
//! The document-control core: the lifecycle state machine, the document
//! service (creation, files, access tracking, QR verification), and the
//! document-number generator. Everything here operates on the store ports
//! from `docflow-database` and the collaborator traits from `docflow-core`;
//! no ambient state is reached for.

pub mod context;
pub mod document;
pub mod lifecycle;
pub mod number;

pub use context::RequestContext;
pub use document::DocumentService;
pub use lifecycle::LifecycleEngine;
pub use number::DocumentNumberGenerator;
