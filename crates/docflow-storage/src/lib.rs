//! # docflow-storage
//!
//! Storage backends for Docflow and the canonical path layout that maps
//! each document status to its storage folder. The [`StorageProvider`]
//! trait itself lives in `docflow-core`; this crate ships the local
//! filesystem implementation.
//!
//! [`StorageProvider`]: docflow_core::traits::StorageProvider

pub mod layout;
pub mod providers;

pub use layout::PathLayout;
pub use providers::local::LocalStorageProvider;
