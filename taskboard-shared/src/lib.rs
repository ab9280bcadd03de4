//! # Taskboard Shared Library
//!
//! Database access, domain models, authentication primitives and business
//! services used by the Taskboard API server.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool, migrations and seed data
//! - `models`: Database models and their queries
//! - `patch`: Tri-state field type for partial updates
//! - `auth`: Password hashing, JWT and request authentication
//! - `services`: Business rules on top of the models

pub mod auth;
pub mod db;
pub mod models;
pub mod patch;
pub mod services;

