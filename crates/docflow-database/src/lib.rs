//! # docflow-database
//!
//! PostgreSQL connection management, migrations, and concrete
//! implementations of the Docflow store ports — both Postgres-backed and
//! in-memory (for single-node setups and tests).

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{
    AccessStore, ApprovalStore, DocumentStore, RevisionStore, StatusCount, TransitionGuard,
};
