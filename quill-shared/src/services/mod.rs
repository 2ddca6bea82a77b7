/// Business logic for the blogging API
///
/// Services validate input, enforce ownership and visibility rules, and
/// talk to storage through the [`crate::store`] ports. They know nothing
/// about HTTP; the API crate maps [`ServiceError`] onto status codes.
///
/// # Services
///
/// - [`auth::AuthService`]: registration and login
/// - [`posts::PostService`]: post lifecycle (create, list, read, update,
///   publish, soft delete)

pub mod auth;
pub mod error;
pub mod posts;

pub use auth::AuthService;
pub use error::{ServiceError, ServiceResult};
pub use posts::PostService;

/// Returns the trimmed value of a required text field
///
/// Absent and whitespace-only values are both rejected.
pub(crate) fn required<'a>(field: &str, value: Option<&'a str>) -> ServiceResult<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ServiceError::Validation(format!("{} is required", field))),
    }
}
