/// API route handlers
///
/// - `health`: welcome text and health check
/// - `auth`: registration and login
/// - `posts`: post lifecycle

pub mod auth;
pub mod health;
pub mod posts;
