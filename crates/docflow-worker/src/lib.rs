//! # docflow-worker
//!
//! Asynchronous execution of post-commit side effects: notification
//! fan-out, QR artifact generation, and the periodic expiry sweep. The
//! user-facing transition call returns as soon as its state change
//! commits; everything here runs afterwards, at-least-once, and failures
//! are logged rather than surfaced.

pub mod executor;
pub mod jobs;
pub mod queue;
pub mod scheduler;

pub use executor::SideEffectWorker;
pub use queue::WorkerQueue;
pub use scheduler::CronScheduler;
