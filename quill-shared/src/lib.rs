//! # Quill Shared Library
//!
//! This crate contains the domain types, storage adapters, and business logic
//! used by the Quill API server.
//!
//! ## Module Organization
//!
//! - `models`: User and Post records plus their PostgreSQL queries
//! - `store`: Storage ports (`UserStore`, `PostStore`) and their adapters
//! - `auth`: Password hashing, JWT issuance and the bearer-token middleware
//! - `services`: Auth and Post services (validation + ownership rules)
//! - `slug`: Title → slug derivation
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod slug;
pub mod store;

/// Current version of the Quill shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
