//! # Quill API Server Library
//!
//! HTTP surface for the Quill blogging API.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration loaded from the environment
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Response-level middleware (security headers)
//! - `routes`: Route handlers for health, auth and posts

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
