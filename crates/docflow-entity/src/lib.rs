//! # docflow-entity
//!
//! Domain entity models for Docflow. Every struct in this crate represents
//! a database table row or a domain value object. All entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`, and database entities
//! additionally derive `sqlx::FromRow`.

pub mod access;
pub mod approval;
pub mod department;
pub mod document;
pub mod revision;
pub mod user;
