//! Side-effect job implementations.

pub mod archive;
pub mod notification;
pub mod qr;

pub use archive::ArchiveExpiredJob;
pub use notification::NotificationJob;
pub use qr::QrGenerationJob;
