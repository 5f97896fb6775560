//! Document aggregate: the entity model, its status enum, the number
//! format, and the revision version value type.

pub mod model;
pub mod number;
pub mod status;
pub mod version;

pub use model::{CreateDocument, Document, DocumentPatch};
pub use number::{fallback_document_number, format_document_number};
pub use status::DocumentStatus;
pub use version::VersionNumber;
