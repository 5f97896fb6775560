//! Identity and role model.

pub mod model;
pub mod role;

pub use model::User;
pub use role::{Capability, UserRole};
