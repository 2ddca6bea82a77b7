/// Response middleware for the API server
///
/// - `security`: security headers on every response

pub mod security;
